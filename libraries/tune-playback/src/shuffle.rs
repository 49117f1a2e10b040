//! Queue shuffling
//!
//! Uniform Fisher-Yates permutation of the play queue. The original order is
//! not retained: turning shuffle off keeps whatever order the queue has.

use rand::seq::SliceRandom;
use rand::Rng;
use tune_core::TrackId;

/// Shuffle tracks in place with a caller-supplied RNG
///
/// Every permutation is equally likely.
pub fn shuffle_tracks_with<R: Rng + ?Sized>(tracks: &mut [TrackId], rng: &mut R) {
    tracks.shuffle(rng);
}
