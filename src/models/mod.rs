//! Data models for the catalog

pub mod book;

// Re-export commonly used types
pub use book::{Book, BookFilter, BookQuery};
