//! Property-based tests for the playback engine
//!
//! Uses proptest to check navigation, queue and volume invariants across
//! random queues and operation sequences.

mod common;

use common::{id, Harness};
use proptest::prelude::*;
use std::collections::HashSet;
use tune_core::TrackId;

// ===== Helpers =====

const CATALOG_SIZE: i64 = 8;

/// Queues over a small catalog, so duplicates show up often
fn arbitrary_queue() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1..=CATALOG_SIZE, 1..30)
}

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    Add(i64),
    Remove(i64),
    Toggle,
    Shuffle(bool),
    EndOfMedia,
    Clear,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Next),
        3 => Just(Op::Previous),
        2 => (1..=CATALOG_SIZE).prop_map(Op::Add),
        2 => (1..=CATALOG_SIZE).prop_map(Op::Remove),
        1 => Just(Op::Toggle),
        1 => any::<bool>().prop_map(Op::Shuffle),
        2 => Just(Op::EndOfMedia),
        1 => Just(Op::Clear),
    ]
}

fn sorted(tracks: &[TrackId]) -> Vec<TrackId> {
    let mut tracks = tracks.to_vec();
    tracks.sort();
    tracks
}

// ===== Property Tests =====

proptest! {
    /// Property: len nexts visit every slot once and return to the start
    #[test]
    fn next_cycle_returns_to_start(queue in arbitrary_queue(), start in 0usize..30) {
        let mut h = Harness::new(CATALOG_SIZE);
        let start = start % queue.len();
        h.engine.set_queue(queue.iter().copied().map(id).collect());
        h.engine.play_at(start).unwrap();

        let mut visited = HashSet::new();
        for _ in 0..queue.len() {
            h.engine.play_next().unwrap();
            visited.insert(h.engine.current_index().unwrap());
        }

        prop_assert_eq!(h.engine.current_index(), Some(start));
        prop_assert_eq!(visited.len(), queue.len());
    }

    /// Property: previous undoes next when shuffle is off
    #[test]
    fn previous_after_next_restores_index(queue in arbitrary_queue(), start in 0usize..30) {
        let mut h = Harness::new(CATALOG_SIZE);
        let start = start % queue.len();
        h.engine.set_queue(queue.iter().copied().map(id).collect());
        h.engine.play_at(start).unwrap();

        h.engine.play_next().unwrap();
        h.engine.play_previous().unwrap();

        prop_assert_eq!(h.engine.current_index(), Some(start));
        prop_assert_eq!(h.engine.current_track_id(), Some(id(queue[start])));
    }

    /// Property: clear always leaves an idle, empty engine
    #[test]
    fn clear_resets_everything(queue in arbitrary_queue(), nexts in 0usize..10) {
        let mut h = Harness::new(CATALOG_SIZE);
        h.play_queue(&queue);
        for _ in 0..nexts {
            h.engine.play_next().unwrap();
        }

        h.engine.clear_queue();

        prop_assert!(!h.engine.is_playing());
        prop_assert!(h.engine.queue().is_empty());
        prop_assert_eq!(h.engine.current_index(), None);
        prop_assert!(h.recorder.live_sessions().is_empty());
    }

    /// Property: volume is always clamped into [0, 1]
    #[test]
    fn volume_always_clamped(level in prop::num::f32::ANY) {
        let mut h = Harness::new(1);
        let applied = h.engine.set_volume(level);

        prop_assert!((0.0..=1.0).contains(&applied));
        prop_assert_eq!(applied, h.engine.volume());
        if (0.0..=1.0).contains(&level) {
            prop_assert_eq!(applied, level);
        }
    }

    /// Property: end of media replays when looped, advances otherwise
    #[test]
    fn end_of_media_follows_loop_mode(
        queue in arbitrary_queue(),
        start in 0usize..30,
        looped in any::<bool>()
    ) {
        let mut h = Harness::new(CATALOG_SIZE);
        let start = start % queue.len();
        h.engine.set_queue(queue.iter().copied().map(id).collect());
        h.engine.play_at(start).unwrap();
        h.engine.set_looped(looped);

        h.finish_current();

        let expected = if looped { start } else { (start + 1) % queue.len() };
        prop_assert_eq!(h.engine.current_index(), Some(expected));
        prop_assert!(h.engine.is_playing());
    }

    /// Property: shuffling never loses or duplicates queue entries
    #[test]
    fn shuffle_preserves_multiset(queue in arbitrary_queue(), nexts in 1usize..10) {
        let mut h = Harness::new(CATALOG_SIZE);
        h.play_queue(&queue);
        let before = sorted(h.engine.queue());

        h.engine.set_shuffled(true);
        for _ in 0..nexts {
            h.engine.play_next().unwrap();
        }

        prop_assert_eq!(sorted(h.engine.queue()), before);
    }

    /// Property: arbitrary operation sequences keep the engine consistent
    #[test]
    fn random_operations_keep_invariants(
        queue in arbitrary_queue(),
        ops in prop::collection::vec(arbitrary_op(), 1..40)
    ) {
        let mut h = Harness::new(CATALOG_SIZE);
        h.play_queue(&queue);

        for op in ops {
            match op {
                Op::Next => h.engine.play_next().unwrap(),
                Op::Previous => h.engine.play_previous().unwrap(),
                Op::Add(n) => h.engine.add_to_queue(id(n)),
                Op::Remove(n) => {
                    h.engine.remove_from_queue(id(n));
                }
                Op::Toggle => h.engine.toggle_play_pause().unwrap(),
                Op::Shuffle(enabled) => h.engine.set_shuffled(enabled),
                Op::EndOfMedia => {
                    if let Some(session) = h.engine.session_id() {
                        h.engine.handle_end_of_media(session).unwrap();
                    }
                }
                Op::Clear => h.engine.clear_queue(),
            }

            let len = h.engine.queue().len();
            match h.engine.current_index() {
                Some(index) => prop_assert!(index < len),
                None => prop_assert_eq!(len, 0),
            }
            prop_assert!(h.recorder.live_sessions().len() <= 1);
            prop_assert_eq!(
                h.engine.session_id().is_some(),
                h.recorder.live_sessions().len() == 1
            );
        }
    }
}
