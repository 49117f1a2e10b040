//! Resolved track metadata handed to the playback engine

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the media backend should read audio from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceHandle {
    /// Local file (purchased download or preview cache)
    File(PathBuf),

    /// Remote or backend-specific URI
    Uri(String),
}

impl SourceHandle {
    /// Human-readable location, used in log output
    pub fn describe(&self) -> String {
        match self {
            SourceHandle::File(path) => path.display().to_string(),
            SourceHandle::Uri(uri) => uri.clone(),
        }
    }
}

/// Playable track returned by a `TrackResolver`
///
/// Only kept for the lifetime of the session that plays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTrack {
    /// Audio location for the media backend
    pub source: SourceHandle,

    /// Track title shown in the now-playing panel
    pub display_name: String,

    /// Artist name shown in the now-playing panel
    pub artist_name: String,

    /// Catalog duration in seconds
    pub duration_seconds: u32,
}

impl ResolvedTrack {
    /// Catalog duration as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_seconds))
    }
}
