//! Repository layer holding the in-memory catalog

pub mod books;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::Book;

/// Main repository struct. Clones share the same underlying table.
///
/// Readers take the shared lock; every mutation holds the exclusive lock
/// across its existence check and write, so concurrent writers on the
/// same id are serialized.
#[derive(Clone, Default)]
pub struct Repository {
    books: Arc<RwLock<HashMap<i64, Book>>>,
}

impl Repository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }
}
