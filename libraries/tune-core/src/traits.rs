/// Core traits for Tune Store
use crate::types::{ResolvedTrack, TrackId};
use std::sync::Arc;

/// Catalog lookup consumed by the playback engine
///
/// Implementers turn a track id into something playable. Lookups may fail at
/// any time (track deleted, file missing); failures are reported as `None` and
/// the engine keeps its current session.
pub trait TrackResolver: Send + Sync {
    /// Resolve a track id to a playable source and its display metadata
    fn resolve(&self, track_id: TrackId) -> Option<ResolvedTrack>;
}

impl<T: TrackResolver + ?Sized> TrackResolver for Arc<T> {
    fn resolve(&self, track_id: TrackId) -> Option<ResolvedTrack> {
        (**self).resolve(track_id)
    }
}

impl<T: TrackResolver + ?Sized> TrackResolver for Box<T> {
    fn resolve(&self, track_id: TrackId) -> Option<ResolvedTrack> {
        (**self).resolve(track_id)
    }
}
