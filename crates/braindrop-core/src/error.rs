//! Error types for braindrop-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using braindrop-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// A failure talking to the raindrop.io API.
///
/// Network, TLS, HTTP status and payload problems all collapse into this one
/// type; callers only ever get a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// Errors that can occur in braindrop-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote API error
    #[error("Raindrop API error: {0}")]
    Api(#[from] ApiError),

    /// The persisted snapshot could not be understood
    #[error("Local data at {} is unreadable: {reason}", path.display())]
    CorruptSnapshot { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A download is already running against this store
    #[error("A download is already in progress")]
    DownloadInProgress,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the error leaves the in-memory data usable.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}
