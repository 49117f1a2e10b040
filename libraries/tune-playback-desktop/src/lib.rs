//! Desktop playback service for Tune Store
//!
//! Runs the platform-agnostic `tune-playback` engine on a dedicated thread and
//! provides a wall-clock media backend for environments without an audio
//! device.
//!
//! # Features
//!
//! - `PlaybackService`: thread confinement, bounded command channel,
//!   periodic position updates, snapshot requests
//! - `ClockBackend`: silent sessions that keep time and report end of media
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tune_core::{Catalog, TrackId};
//! use tune_playback::{PlaybackConfig, PlaybackEvent};
//! use tune_playback_desktop::{ClockBackend, PlaybackService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load("catalog.toml")?;
//! let service = PlaybackService::spawn(
//!     &PlaybackConfig::default(),
//!     Arc::new(catalog),
//!     Box::new(ClockBackend::new()),
//! )?;
//!
//! let events = service.subscribe();
//! service.set_queue(vec![TrackId::new(1), TrackId::new(2)])?;
//! service.play_at(0)?;
//!
//! while let Some(event) = events.recv() {
//!     if let PlaybackEvent::TrackChanged { display_name, .. } = event {
//!         println!("Now playing: {}", display_name);
//!     }
//! }
//!
//! service.shutdown()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod clock;
mod error;
pub mod service;

pub use clock::{ClockBackend, ClockSession, MAX_SPEED, MIN_SPEED};
pub use error::{Result, ServiceError};
pub use service::{PlaybackCommand, PlaybackService};
