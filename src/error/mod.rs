//! Error handling module for webpcut

use thiserror::Error;

/// Main error type for webpcut operations
#[derive(Error, Debug)]
pub enum WebpcutError {
    /// Parameters outside their documented domain; reported before any work
    /// is attempted.
    #[error("Invalid parameters: {message}")]
    Validation { message: String },

    /// Backend load or exec failure, surfaced after the loader fallback chain
    /// has been exhausted.
    #[error("Engine error: {message}")]
    Engine { message: String },

    /// User-initiated abort. Not a fault; carries no diagnostic.
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebpcutError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// True for user-initiated aborts, which callers must not report as
    /// failures.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for webpcut operations
pub type WebpcutResult<T> = std::result::Result<T, WebpcutError>;
