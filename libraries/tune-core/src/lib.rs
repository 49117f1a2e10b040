//! Tune Store Core
//!
//! Shared types and traits used by the playback crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackId`, `SourceHandle`, `ResolvedTrack`
//! - **Core Traits**: `TrackResolver` (catalog lookup consumed by playback)
//! - **Catalog**: an in-memory `TrackResolver` loaded from TOML or JSON
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use tune_core::{Catalog, TrackId, TrackResolver};
//!
//! let catalog = Catalog::from_toml_str(
//!     r#"
//!     [[tracks]]
//!     id = 7
//!     name = "Blue in Green"
//!     artist = "Miles Davis"
//!     duration_seconds = 337
//!     source = { uri = "https://cdn.example.com/7.mp3" }
//!     "#,
//! )
//! .unwrap();
//!
//! let track = catalog.resolve(TrackId::new(7)).unwrap();
//! assert_eq!(track.display_name, "Blue in Green");
//! assert!(catalog.resolve(TrackId::new(8)).is_none());
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{CoreError, Result};
pub use traits::TrackResolver;
pub use types::{ResolvedTrack, SourceHandle, TrackId};
