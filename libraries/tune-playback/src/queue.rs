//! Play queue with a wrapping cursor
//!
//! The queue is a flat ordered list of track ids. Duplicates are allowed and
//! insertion order is the default play order. A cursor marks the current
//! track; it always points inside the list while the list is non-empty.

use rand::Rng;
use tune_core::TrackId;

use crate::shuffle::shuffle_tracks_with;

/// Ordered play queue
///
/// ```text
///   index:   0     1     2
///          [ A ] [ B ] [ C ]
///                  ^ cursor (current track)
///   next     -> 2, then wraps to 0
///   previous -> 0, then wraps to 2
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    tracks: Vec<TrackId>,

    /// Position of the current track; meaningful only when `tracks` is non-empty
    cursor: usize,
}

impl PlayQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole queue
    ///
    /// The cursor is kept where it was, clamped into the new range.
    pub fn set(&mut self, tracks: Vec<TrackId>) {
        self.tracks = tracks;
        self.clamp_cursor();
    }

    /// Append a track to the end
    pub fn push(&mut self, track: TrackId) {
        self.tracks.push(track);
    }

    /// Remove the first occurrence of `track`
    ///
    /// Returns the index it was removed from, or `None` if absent. A cursor
    /// that falls off the end is pulled back to the last track.
    pub fn remove_first(&mut self, track: TrackId) -> Option<usize> {
        let index = self.tracks.iter().position(|t| *t == track)?;
        self.tracks.remove(index);
        self.clamp_cursor();
        Some(index)
    }

    /// Remove everything and reset the cursor to 0
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = 0;
    }

    /// Move the cursor forward one slot, wrapping at the end
    pub fn advance(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.tracks.len();
        Some(self.cursor)
    }

    /// Move the cursor back one slot, wrapping at the start
    pub fn retreat(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len();
        self.cursor = (self.cursor + len - 1) % len;
        Some(self.cursor)
    }

    /// Point the cursor at `index`
    ///
    /// Returns the track there, or `None` (cursor unchanged) if out of range.
    pub fn select(&mut self, index: usize) -> Option<TrackId> {
        let track = *self.tracks.get(index)?;
        self.cursor = index;
        Some(track)
    }

    /// Shuffle in place; the cursor keeps its numeric position
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle_tracks_with(&mut self.tracks, rng);
    }

    /// Cursor position, `None` when the queue is empty
    pub fn current_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<TrackId> {
        self.tracks.get(self.cursor).copied()
    }

    pub fn as_slice(&self) -> &[TrackId] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn clamp_cursor(&mut self) {
        if self.tracks.is_empty() {
            // Inactive until something is added; the next track lands at 0
            self.cursor = 0;
        } else if self.cursor >= self.tracks.len() {
            self.cursor = self.tracks.len() - 1;
        }
    }
}
