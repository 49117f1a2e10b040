//! Tune Player Library
//!
//! Composition root for the console player: configuration loading, the
//! console command parser and event rendering.
//!
//! This library exposes the components for testing purposes.

pub mod config;
pub mod console;
pub mod error;

// Re-export commonly used types for convenience
pub use config::PlayerConfig;
pub use console::{parse_line, ConsoleCommand, ConsoleError};
pub use error::{PlayerError, Result};
