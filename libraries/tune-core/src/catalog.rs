//! In-memory track catalog
//!
//! Stand-in for the store database: maps track ids to playable sources and
//! display metadata. Loaded from a TOML or JSON file with a top-level
//! `tracks` array.

use crate::error::{CoreError, Result};
use crate::traits::TrackResolver;
use crate::types::{ResolvedTrack, SourceHandle, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// One purchasable/playable track in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: TrackId,
    pub name: String,
    pub artist: String,
    pub duration_seconds: u32,
    pub source: SourceHandle,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<CatalogEntry>,
}

/// Track catalog implementing `TrackResolver`
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<TrackId, CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries, rejecting duplicate ids and empty tracks
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self> {
        let mut catalog = Self::new();
        for entry in entries {
            if entry.duration_seconds == 0 {
                return Err(CoreError::invalid_input(format!(
                    "track {} has a zero duration",
                    entry.id
                )));
            }
            if catalog.entries.contains_key(&entry.id) {
                return Err(CoreError::DuplicateTrack(entry.id));
            }
            catalog.entries.insert(entry.id, entry);
        }
        Ok(catalog)
    }

    /// Parse a TOML catalog
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_entries(file.tracks)
    }

    /// Parse a JSON catalog
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::from_entries(file.tracks)
    }

    /// Load a catalog file, picking the parser from the extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let catalog = match extension.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            other => return Err(CoreError::UnsupportedFormat(other.to_string())),
        };

        info!("Loaded {} tracks from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.id, entry)
    }

    /// Remove an entry (e.g. the track was delisted)
    pub fn remove(&mut self, track_id: TrackId) -> Option<CatalogEntry> {
        self.entries.remove(&track_id)
    }

    /// Look up an entry without checking its source
    pub fn get(&self, track_id: TrackId) -> Option<&CatalogEntry> {
        self.entries.get(&track_id)
    }

    /// All track ids, sorted
    pub fn track_ids(&self) -> Vec<TrackId> {
        let mut ids: Vec<TrackId> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TrackResolver for Catalog {
    fn resolve(&self, track_id: TrackId) -> Option<ResolvedTrack> {
        let Some(entry) = self.entries.get(&track_id) else {
            debug!("Track {} is not in the catalog", track_id);
            return None;
        };

        if let SourceHandle::File(path) = &entry.source {
            if !path.is_file() {
                debug!("Track {} source is missing: {}", track_id, path.display());
                return None;
            }
        }

        Some(ResolvedTrack {
            source: entry.source.clone(),
            display_name: entry.name.clone(),
            artist_name: entry.artist.clone(),
            duration_seconds: entry.duration_seconds,
        })
    }
}
