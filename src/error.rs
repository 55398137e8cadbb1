//! Error types for the habbit-store library.
//!
//! Reads from the record store never surface these: a missing or unreadable
//! collection degrades to its default value. Errors are only returned when a
//! write cannot reach the backend, when input fails validation, or when a
//! collaborator (such as the notification scheduler) refuses a request.

use thiserror::Error;

/// Errors that can occur in the habbit-store library.
#[derive(Error, Debug)]
pub enum HabbitError {
    /// Key-value backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Binary serialization errors
    #[error("Binary serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input rejected by validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Notification permission was not granted
    #[error("Notification permission denied")]
    NotificationDenied,

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with HabbitError
pub type Result<T> = std::result::Result<T, HabbitError>;

impl From<anyhow::Error> for HabbitError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<sled::Error> for HabbitError {
    fn from(err: sled::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
