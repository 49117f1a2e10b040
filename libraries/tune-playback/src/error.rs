//! Error types for playback management

use thiserror::Error;
use tune_core::TrackId;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Resolver returned no playable source for the track
    #[error("Track {0} could not be resolved")]
    Unresolvable(TrackId),

    /// Operation needs a live media session
    #[error("No active media session")]
    NoActiveSession,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Media backend failure (open, decode, device)
    #[error("Media backend error: {0}")]
    Media(String),
}

impl PlaybackError {
    /// Create a media backend error
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
