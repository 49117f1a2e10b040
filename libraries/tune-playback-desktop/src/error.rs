//! Playback service errors

use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Playback service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The playback thread is gone (shut down or panicked)
    #[error("Playback thread disconnected")]
    Disconnected,

    /// Failed to spawn the playback thread
    #[error("Failed to spawn playback thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The playback thread panicked before it could be joined
    #[error("Playback thread panicked")]
    ThreadPanicked,
}
