//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;
use tune_core::{ResolvedTrack, TrackId};

/// Playback state of the active session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No session (before the first track, after clear/stop or a media fault)
    Idle,

    /// Session opened, not started yet
    Loaded,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Identifier stamped on every media session
///
/// Backend notifications carry it so a late end-of-media from a session that
/// has already been replaced is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 0.8)
    pub volume: f32,

    /// Initial loop mode (default: false)
    pub looped: bool,

    /// Initial shuffle mode (default: false)
    pub shuffled: bool,

    /// Interval between position updates while playing (default: 250 ms)
    pub position_interval_ms: u64,

    /// Capacity of the command channel (default: 32)
    pub command_buffer: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            looped: false,
            shuffled: false,
            position_interval_ms: 250,
            command_buffer: 32,
        }
    }
}

/// Read-only view of everything the UI shows about playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub queue: Vec<TrackId>,
    pub current_index: Option<usize>,
    pub current_track_id: Option<TrackId>,
    pub current_track: Option<ResolvedTrack>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub volume: f32,
    pub looped: bool,
    pub shuffled: bool,
}

impl PlaybackSnapshot {
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.volume, 0.8);
        assert!(!config.looped);
        assert!(!config.shuffled);
        assert_eq!(config.position_interval_ms, 250);
        assert_eq!(config.command_buffer, 32);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PlaybackConfig = serde_json::from_str(r#"{"looped":true}"#).unwrap();
        assert!(config.looped);
        assert_eq!(config.volume, 0.8);
    }

    #[test]
    fn session_id_display() {
        assert_eq!(SessionId::new(3).to_string(), "#3");
    }
}
