//! Tune Store - Playback Engine
//!
//! Platform-agnostic playback control for the Tune Store app.
//!
//! This crate provides:
//! - Play queue with a wrapping cursor (duplicates allowed)
//! - Next / previous navigation, wrapping at both ends
//! - Shuffle (reshuffled on every "next" while enabled)
//! - Loop of the current track at end of media
//! - Volume control (clamped to `[0.0, 1.0]`)
//! - Seek (time and percentage)
//! - Observer events for views (`subscribe`, unsubscribe on drop)
//!
//! # Architecture
//!
//! `tune-playback` never decodes audio and owns no threads:
//! - Track metadata comes from a [`TrackResolver`](tune_core::TrackResolver)
//! - Audio comes from a [`MediaBackend`] that opens one [`MediaSession`] per track
//! - End-of-media and faults arrive through a [`MediaNotifier`]; whoever owns
//!   the engine routes them back to [`PlaybackEngine::handle_end_of_media`]
//!   on the engine's thread
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tune_core::{Catalog, ResolvedTrack, TrackId};
//! use tune_playback::{
//!     MediaBackend, MediaNotifier, MediaSession, PlaybackConfig, PlaybackEngine, Result,
//!     SessionId,
//! };
//!
//! struct Speaker;
//!
//! impl MediaBackend for Speaker {
//!     fn open(
//!         &mut self,
//!         track: &ResolvedTrack,
//!         session: SessionId,
//!         notifier: MediaNotifier,
//!     ) -> Result<Box<dyn MediaSession>> {
//!         // Platform-specific player
//!         # unimplemented!()
//!     }
//! }
//!
//! let catalog = Catalog::load("catalog.toml").unwrap();
//! let mut engine = PlaybackEngine::new(
//!     &PlaybackConfig::default(),
//!     Arc::new(catalog),
//!     Box::new(Speaker),
//!     MediaNotifier::noop(),
//! );
//!
//! engine.set_queue(vec![TrackId::new(1), TrackId::new(2)]);
//! engine.play_at(0).unwrap();
//! engine.set_volume(0.5);
//! engine.play_next().unwrap();
//! engine.seek(Duration::from_secs(30)).unwrap();
//! ```

mod engine;
mod error;
pub mod events;
mod queue;
pub mod session;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{EventHub, PlaybackEvent, Subscription, EVENT_BUFFER};
pub use queue::PlayQueue;
pub use session::{MediaBackend, MediaNotification, MediaNotifier, MediaSession};
pub use shuffle::shuffle_tracks_with;
pub use types::{PlaybackConfig, PlaybackSnapshot, PlaybackState, SessionId};
pub use volume::Volume;
