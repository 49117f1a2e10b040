//! Playback Events
//!
//! Observer mechanism for UI synchronization. Views call
//! [`EventHub::subscribe`] and receive every [`PlaybackEvent`] published after
//! that point on their own channel. Dropping the [`Subscription`] detaches it
//! immediately, so torn-down views never accumulate events. Each channel
//! holds at most [`EVENT_BUFFER`] events; a view that stops draining misses
//! newer events instead of growing without bound.
//!
//! Events are emitted at key points:
//! - State changes (play/pause/idle)
//! - Track changes (new session started)
//! - Position updates (periodic, driven by the owner of the engine)
//! - Volume, loop, shuffle and queue changes

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::{trace, warn};
use tune_core::TrackId;

use crate::types::{PlaybackState, SessionId};

/// Pending events a single subscriber may hold
pub const EVENT_BUFFER: usize = 256;

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A new session started playing
    TrackChanged {
        track_id: TrackId,
        session: SessionId,
        display_name: String,
        artist_name: String,
        duration_ms: u64,
    },

    /// Current track reached its end
    TrackFinished {
        track_id: TrackId,
    },

    /// Position update (periodic and after seeks)
    PositionChanged {
        position_ms: u64,
        duration_ms: u64,
    },

    /// Volume changed (applied, post-clamp level)
    VolumeChanged {
        level: f32,
    },

    /// Queue contents or order changed
    QueueChanged {
        length: usize,
        current_index: Option<usize>,
    },

    LoopChanged {
        enabled: bool,
    },

    ShuffleChanged {
        enabled: bool,
    },

    /// Something failed; the UI is expected to show `message`
    Error {
        message: String,
    },
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<(u64, Sender<PlaybackEvent>)>,
}

fn lock(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
    // A panicking subscriber thread must not take playback down with it
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out of playback events to any number of subscribers
///
/// Cheap to clone; clones share the subscriber list.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = bounded(EVENT_BUFFER);
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, tx));

        Subscription {
            id,
            receiver: rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every live subscriber
    ///
    /// Never blocks: a subscriber whose buffer is full misses the event.
    pub fn publish(&self, event: PlaybackEvent) {
        let mut inner = lock(&self.inner);
        inner
            .subscribers
            .retain(|(id, tx)| match tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(PlaybackEvent::PositionChanged { .. })) => {
                    trace!("Subscriber {} is full, dropping position update", id);
                    true
                }
                Err(TrySendError::Full(dropped)) => {
                    warn!("Subscriber {} is not draining, dropping {:?}", id, dropped);
                    true
                }
                // Receivers dropped without going through Subscription::drop (mem::forget)
                Err(TrySendError::Disconnected(_)) => false,
            });
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle held by one view; unsubscribes on drop
pub struct Subscription {
    id: u64,
    receiver: Receiver<PlaybackEvent>,
    hub: Weak<Mutex<HubInner>>,
}

impl Subscription {
    /// Block until the next event; `None` once the hub is gone
    pub fn recv(&self) -> Option<PlaybackEvent> {
        self.receiver.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<PlaybackEvent, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<PlaybackEvent, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Everything queued right now, without blocking
    pub fn drain(&self) -> Vec<PlaybackEvent> {
        self.receiver.try_iter().collect()
    }

    /// Underlying receiver, for use in `crossbeam_channel::select!`
    pub fn receiver(&self) -> &Receiver<PlaybackEvent> {
        &self.receiver
    }

    /// Detach explicitly (same as dropping)
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            lock(&inner).subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pending", &self.receiver.len())
            .finish()
    }
}
