//! Error types for giftsearch.
//!
//! All fallible operations return [`GiftSearchError`] through the crate-wide
//! [`Result`] alias. Query syntax problems keep their precise
//! [`SyntaxError`] kind so callers can tell a malformed query apart from an
//! unreadable index.
//!
//! # Examples
//!
//! ```
//! use giftsearch::error::{GiftSearchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(GiftSearchError::invalid_argument("limit must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::query::parser::SyntaxError;

/// The main error type for giftsearch operations.
#[derive(Error, Debug)]
pub enum GiftSearchError {
    /// The query string could not be parsed.
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// I/O errors (reading an index or config file)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The index document is structurally wrong.
    #[error("Index error: {0}")]
    Index(String),

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument supplied by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Thread pool construction failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for operations that may fail with GiftSearchError.
pub type Result<T> = std::result::Result<T, GiftSearchError>;

impl GiftSearchError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        GiftSearchError::Index(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        GiftSearchError::Config(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        GiftSearchError::InvalidArgument(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        GiftSearchError::Internal(msg.into())
    }

    /// Whether this error came from the query parser.
    pub fn is_syntax(&self) -> bool {
        matches!(self, GiftSearchError::Syntax(_))
    }
}
