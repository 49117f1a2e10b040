/// Core error types for Tune Store
use thiserror::Error;

use crate::types::TrackId;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Track id appears twice in a catalog
    #[error("Duplicate track id in catalog: {0}")]
    DuplicateTrack(TrackId),

    /// Catalog file has an extension we do not know how to parse
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML parse errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// JSON parse errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
