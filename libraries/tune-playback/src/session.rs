//! Media backend abstraction
//!
//! The engine never decodes audio. A `MediaBackend` opens one `MediaSession`
//! per track; the session is exclusively owned by the engine and released
//! before the next one is opened.

use crate::error::Result;
use crate::types::SessionId;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tune_core::ResolvedTrack;

/// Asynchronous notification from a media backend
#[derive(Debug, Clone, PartialEq)]
pub enum MediaNotification {
    /// The session reached the end of its media
    EndOfMedia(SessionId),

    /// The session failed (corrupt source, decode error, device lost)
    Error { session: SessionId, message: String },
}

impl MediaNotification {
    pub fn session(&self) -> SessionId {
        match self {
            MediaNotification::EndOfMedia(session) => *session,
            MediaNotification::Error { session, .. } => *session,
        }
    }
}

/// Callback a backend uses to report end-of-media and faults
///
/// Backends call it from their own notification thread. The owner of the
/// engine decides how the notification gets back to the engine's thread.
#[derive(Clone)]
pub struct MediaNotifier {
    callback: Arc<dyn Fn(MediaNotification) + Send + Sync>,
}

impl MediaNotifier {
    pub fn new(callback: impl Fn(MediaNotification) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Notifier that drops everything (tests drive end-of-media by hand)
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn notify(&self, notification: MediaNotification) {
        (self.callback)(notification);
    }

    pub fn end_of_media(&self, session: SessionId) {
        self.notify(MediaNotification::EndOfMedia(session));
    }

    pub fn error(&self, session: SessionId, message: impl Into<String>) {
        self.notify(MediaNotification::Error {
            session,
            message: message.into(),
        });
    }
}

impl fmt::Debug for MediaNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaNotifier").finish_non_exhaustive()
    }
}

/// Live playback context for exactly one track
pub trait MediaSession: Send {
    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position
    fn pause(&mut self) -> Result<()>;

    /// Seek to position from start of track
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current playback position
    fn position(&self) -> Duration;

    /// Total track duration
    fn duration(&self) -> Duration;

    /// Apply a volume level in `[0.0, 1.0]`
    fn set_volume(&mut self, level: f32);

    /// Stop playback and free backend resources
    ///
    /// No notifications may be delivered for this session afterwards.
    fn release(&mut self);
}

/// Factory for media sessions
pub trait MediaBackend: Send {
    /// Load `track.source` into a new session
    ///
    /// The session must report end-of-media and faults through `notifier`,
    /// tagged with `session`.
    fn open(
        &mut self,
        track: &ResolvedTrack,
        session: SessionId,
        notifier: MediaNotifier,
    ) -> Result<Box<dyn MediaSession>>;
}
