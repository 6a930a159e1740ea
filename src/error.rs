//! Error types for the Lupe library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`LupeError`] enum. Engine-level failures surfaced by tantivy propagate
//! unmodified through the [`LupeError::Engine`] variant; there is no retry
//! or recovery at this layer.
//!
//! # Examples
//!
//! ```
//! use lupe::error::{LupeError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LupeError::storage("storage is not available"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Lupe operations.
#[derive(Error, Debug)]
pub enum LupeError {
    /// I/O errors (file operations, metadata lookups, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors raised by the underlying index engine.
    #[error("Engine error: {0}")]
    Engine(#[from] tantivy::TantivyError),

    /// Index-related errors (missing or inconsistent index state)
    #[error("Index error: {0}")]
    Index(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Index format errors (unreadable or unrecognized file footers)
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LupeError.
pub type Result<T> = std::result::Result<T, LupeError>;

impl LupeError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        LupeError::Index(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        LupeError::Storage(msg.into())
    }

    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        LupeError::Format(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LupeError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LupeError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
