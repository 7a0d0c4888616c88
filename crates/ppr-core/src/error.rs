//! Error types for the core data contract

use thiserror::Error;

/// Errors raised while accepting a render request body
#[derive(Error, Debug)]
pub enum RequestError {
    /// Body is not valid JSON
    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Body has no `data` member
    #[error("Request body has no 'data' member")]
    MissingData,

    /// `data` is present but is not an object
    #[error("'data' must be a mapping of string keys to strings, found {0}")]
    NotAMapping(&'static str),

    /// A `data` value is an object or array
    #[error("'data.{key}' must be a plain value, found {found}")]
    NestedValue {
        /// Offending variable key
        key: String,
        /// JSON type that was found
        found: &'static str,
    },
}

/// Result type for request handling
pub type Result<T> = std::result::Result<T, RequestError>;
