//! Error types for the catalog server

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error as StdError;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// A single offending field in a rejected record or request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Name of the field
    pub field: String,
    /// Why the value was rejected
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid field: {}", field_names(.0))]
    InvalidField(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a single-field validation failure
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::InvalidField(vec![FieldError::new(field, reason)])
    }

    /// Names of the rejected fields, empty for every other kind
    pub fn fields(&self) -> Vec<&str> {
        match self {
            AppError::InvalidField(errors) => errors.iter().map(|e| e.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

fn field_names(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error response body
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    /// Per-field detail, only present on validation failures
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::AlreadyExists(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            AppError::InvalidField(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid field: {}", field_names(&details)),
                details,
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = Json(ErrorResponse { message, details });

        (status, body).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let reason = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldError::new(field.to_string(), reason)
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::InvalidField(details)
    }
}

// Serde reports a missing struct field at the struct itself, so the name
// only appears in the message.
static MISSING_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"missing field `([^`]+)`").expect("valid regex"));

/// Field a path-tracked deserialization failure refers to
fn field_of<E: std::fmt::Display>(err: &serde_path_to_error::Error<E>, fallback: &str) -> String {
    if err.path().iter().next().is_some() {
        return err.path().to_string();
    }
    MISSING_FIELD
        .captures(&err.inner().to_string())
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Find the path-tracked serde error behind an extractor rejection
fn json_path_error<'a>(
    err: &'a (dyn StdError + 'static),
) -> Option<&'a serde_path_to_error::Error<serde_json::Error>> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<serde_path_to_error::Error<serde_json::Error>>() {
            return Some(found);
        }
        current = e.source();
    }
    None
}

/// Strip the extractor's prefix, keeping serde's own text
fn detail_of(body_text: &str) -> &str {
    body_text
        .split_once(": ")
        .map(|(_, rest)| rest)
        .unwrap_or(body_text)
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => match json_path_error(&err) {
                Some(path_err) => AppError::invalid_field(
                    field_of(path_err, "body"),
                    path_err.inner().to_string(),
                ),
                None => AppError::invalid_field("body", detail_of(&err.body_text())),
            },
            JsonRejection::JsonSyntaxError(err) => {
                AppError::invalid_field("body", detail_of(&err.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                AppError::invalid_field("id", err.body_text())
            }
            other => AppError::Internal(other.body_text()),
        }
    }
}

impl From<serde_path_to_error::Error<serde_urlencoded::de::Error>> for AppError {
    fn from(err: serde_path_to_error::Error<serde_urlencoded::de::Error>) -> Self {
        AppError::invalid_field(field_of(&err, "query"), err.inner().to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
