//! Error types for Bookalope Core

use crate::types::Step;
use thiserror::Error;

/// Result type alias using BookalopeError
pub type Result<T> = std::result::Result<T, BookalopeError>;

/// Top-level error type for all Bookalope operations
#[derive(Debug, Error)]
pub enum BookalopeError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bookflow error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Server answered with a status the endpoint does not accept
    #[error("HTTP error ({status}): {body}")]
    Http { status: u16, body: String },

    /// Request could not be sent or its body could not be read
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON payload did not have the expected shape
    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Local validation failures, raised before any request is sent
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid Bookalope token: {0}")]
    InvalidToken(String),

    #[error("Invalid credit type: {0} (expected 'basic' or 'pro')")]
    InvalidCredit(String),

    #[error("Invalid locale: {0}")]
    Locale(String),

    #[error("Invalid document type: {0} (expected 'doc', 'epub' or 'gutenberg')")]
    InvalidDocumentType(String),
}

/// Operations that are illegal for the mirrored bookflow state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Can't {operation}: bookflow must be in '{required}' step, but is in '{actual}'")]
    IllegalStep {
        operation: &'static str,
        required: Step,
        actual: Step,
    },

    #[error("Unable to delete bookflow {0} while it is processing")]
    BookflowBusy(String),

    #[error("Bookflow belongs to book {actual}, not {expected}")]
    BookMismatch { expected: String, actual: String },

    #[error("Book is on bookshelf {actual}, not {expected}")]
    BookshelfMismatch { expected: String, actual: String },

    #[error("Book {book} has no bookflow {bookflow}")]
    UnknownBookflow { book: String, bookflow: String },
}

/// Client and server disagree about the wire protocol
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid API server version {found:?} (expected {expected}), please update this client")]
    VersionMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl BookalopeError {
    /// Whether the error was raised locally, before anything was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            BookalopeError::Validation(_)
                | BookalopeError::Lifecycle(_)
                | BookalopeError::InvalidUrl(_)
                | BookalopeError::Config(_)
        )
    }

    /// HTTP status code, if the server rejected the request
    pub fn status(&self) -> Option<u16> {
        match self {
            BookalopeError::Http { status, .. } => Some(*status),
            BookalopeError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
