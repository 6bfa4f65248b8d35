//! Book record, its validation rules and list filters

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult, FieldError};

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Book {
    /// Caller-supplied identifier, unique across the catalog
    pub id: i64,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    /// Year of publication, never later than the current year
    pub published_year: i32,
}

impl Book {
    /// Check the record against the current calendar year.
    pub fn check(&self) -> AppResult<()> {
        self.check_at(current_year())
    }

    /// Check the record as if `current_year` were the present year.
    /// All offending fields are reported together.
    pub fn check_at(&self, current_year: i32) -> AppResult<()> {
        let mut details = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => match AppError::from(errors) {
                AppError::InvalidField(details) => details,
                other => return Err(other),
            },
        };

        if let Err(e) = check_published_year(self.published_year, current_year) {
            details.push(e);
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidField(details))
        }
    }
}

/// Year of the local wall clock
pub fn current_year() -> i32 {
    Local::now().year()
}

fn check_published_year(year: i32, current_year: i32) -> Result<(), FieldError> {
    if year > current_year {
        return Err(FieldError::new("published_year", "Invalid published year"));
    }
    Ok(())
}

/// Query parameters for listing books
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Exact publication year
    pub published_year: Option<i32>,
}

/// Normalized list predicates, ANDed together.
/// A `None` predicate matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    title: Option<String>,
    author: Option<String>,
    published_year: Option<i32>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, needle: impl AsRef<str>) -> Self {
        self.title = normalize(needle.as_ref());
        self
    }

    pub fn author(mut self, needle: impl AsRef<str>) -> Self {
        self.author = normalize(needle.as_ref());
        self
    }

    pub fn published_year(mut self, year: i32) -> Self {
        self.published_year = Some(year);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.published_year.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(ref needle) = self.title {
            if !book.title.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(ref needle) = self.author {
            if !book.author.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(year) = self.published_year {
            if book.published_year != year {
                return false;
            }
        }
        true
    }
}

/// Empty substrings are treated as "no predicate"
fn normalize(needle: &str) -> Option<String> {
    if needle.is_empty() {
        None
    } else {
        Some(needle.to_lowercase())
    }
}

impl From<BookQuery> for BookFilter {
    fn from(query: BookQuery) -> Self {
        let mut filter = BookFilter::new();
        if let Some(title) = query.title {
            filter = filter.title(title);
        }
        if let Some(author) = query.author {
            filter = filter.author(author);
        }
        if let Some(year) = query.published_year {
            filter = filter.published_year(year);
        }
        filter
    }
}
