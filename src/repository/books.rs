//! Book domain methods on Repository

use std::collections::hash_map::Entry;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter},
};

pub(crate) const BOOK_NOT_FOUND: &str = "Book not found";
pub(crate) const BOOK_ALREADY_EXISTS: &str = "Book already exists";

impl Repository {
    /// Snapshot of the books matching `filter`, ordered by id
    pub async fn books_list(&self, filter: &BookFilter) -> Vec<Book> {
        let books = self.books.read().await;
        let mut rows: Vec<Book> = books
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect();
        rows.sort_by_key(|book| book.id);
        rows
    }

    /// Get book by ID
    pub async fn books_get_by_id(&self, id: i64) -> AppResult<Book> {
        self.books
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))
    }

    /// Insert a book under its own id; an existing entry is left untouched
    pub async fn books_create(&self, book: Book) -> AppResult<Book> {
        let mut books = self.books.write().await;
        match books.entry(book.id) {
            Entry::Occupied(_) => Err(AppError::AlreadyExists(BOOK_ALREADY_EXISTS.to_string())),
            Entry::Vacant(slot) => Ok(slot.insert(book).clone()),
        }
    }

    /// Replace the whole entry stored under `id`
    pub async fn books_replace(&self, id: i64, book: Book) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let slot = books
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;
        *slot = book;
        Ok(slot.clone())
    }

    /// Remove a book, returning what was stored
    pub async fn books_delete(&self, id: i64) -> AppResult<Book> {
        self.books
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))
    }

    /// Number of stored books
    pub async fn books_count(&self) -> usize {
        self.books.read().await.len()
    }
}
