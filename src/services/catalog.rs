//! Catalog management service

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::book::{Book, BookFilter},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// List books matching the filter
    pub async fn list(&self, filter: &BookFilter) -> Vec<Book> {
        let books = self.repository.books_list(filter).await;
        tracing::debug!(?filter, count = books.len(), "Catalog list");
        books
    }

    /// Get book by ID
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository.books_get_by_id(id).await
    }

    /// Validate and insert a new book
    pub async fn add(&self, book: Book) -> AppResult<Book> {
        book.check()?;
        let created = self.repository.books_create(book).await?;
        tracing::info!(book_id = created.id, "Catalog: book added");
        Ok(created)
    }

    /// Validate and wholesale-replace the book stored under `id`.
    /// An absent `id` is reported as not found whatever the body holds.
    pub async fn update(&self, id: i64, book: Book) -> AppResult<Book> {
        self.repository.books_get_by_id(id).await?;
        if self.config.strict_update_ids && book.id != id {
            return Err(AppError::invalid_field(
                "id",
                format!("Body id {} does not match path id {}", book.id, id),
            ));
        }
        book.check()?;
        let updated = self.repository.books_replace(id, book).await?;
        tracing::info!(book_id = id, "Catalog: book replaced");
        Ok(updated)
    }

    /// Delete a book, returning the id that was removed
    pub async fn delete(&self, id: i64) -> AppResult<i64> {
        let removed = self.repository.books_delete(id).await?;
        tracing::info!(book_id = removed.id, "Catalog: book deleted");
        Ok(id)
    }

    /// Number of books currently stored
    pub async fn count(&self) -> usize {
        self.repository.books_count().await
    }
}
