//! Playback engine - core orchestration
//!
//! Single authority over "what plays now" and "what plays next". Owns the play
//! queue, the one live media session, and the transport modes (volume, loop,
//! shuffle). Every mutation takes `&mut self`; callers that share the engine
//! across threads must confine it to one thread (see `tune-playback-desktop`).
//!
//! Session lifecycle:
//!
//! ```text
//! Idle -> Loaded -> Playing <-> Paused
//!                     |
//!               end of media
//!          looped: seek 0, keep playing
//!          not looped: play_next (wraps), or Idle if the queue is empty
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tune_core::{ResolvedTrack, TrackId, TrackResolver};

use crate::{
    error::{PlaybackError, Result},
    events::{EventHub, PlaybackEvent, Subscription},
    queue::PlayQueue,
    session::{MediaBackend, MediaNotifier, MediaSession},
    types::{PlaybackConfig, PlaybackSnapshot, PlaybackState, SessionId},
    volume::Volume,
};

/// The session currently owned by the engine
struct ActiveSession {
    id: SessionId,
    track_id: TrackId,
    track: ResolvedTrack,
    media: Box<dyn MediaSession>,
}

/// Central playback engine
///
/// Explicitly constructed and injected; there is no global instance.
pub struct PlaybackEngine {
    // Collaborators
    resolver: Arc<dyn TrackResolver>,
    backend: Box<dyn MediaBackend>,
    notifier: MediaNotifier,

    // State
    state: PlaybackState,
    session: Option<ActiveSession>,
    next_session_id: u64,
    queue: PlayQueue,

    // Settings
    volume: Volume,
    looped: bool,
    shuffled: bool,
    rng: StdRng,

    // Observers
    events: EventHub,
}

impl PlaybackEngine {
    /// Create new playback engine
    ///
    /// `notifier` is handed to every session the backend opens; the caller
    /// routes its notifications back into [`handle_end_of_media`] and
    /// [`handle_media_error`] on the engine's thread.
    ///
    /// [`handle_end_of_media`]: Self::handle_end_of_media
    /// [`handle_media_error`]: Self::handle_media_error
    pub fn new(
        config: &PlaybackConfig,
        resolver: Arc<dyn TrackResolver>,
        backend: Box<dyn MediaBackend>,
        notifier: MediaNotifier,
    ) -> Self {
        Self {
            resolver,
            backend,
            notifier,
            state: PlaybackState::Idle,
            session: None,
            next_session_id: 1,
            queue: PlayQueue::new(),
            volume: Volume::new(config.volume),
            looped: config.looped,
            shuffled: config.shuffled,
            rng: StdRng::from_entropy(),
            events: EventHub::new(),
        }
    }

    /// Use a fixed shuffle seed (reproducible orders in tests and demos)
    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Playback Control =====

    /// Play a track by id, replacing the current session
    ///
    /// The track is resolved first; if that fails the current session keeps
    /// playing untouched and `Unresolvable` is returned. CurrentIndex is not
    /// moved: the track does not have to be in the queue.
    pub fn play_track(&mut self, track_id: TrackId) -> Result<()> {
        let Some(track) = self.resolver.resolve(track_id) else {
            warn!("Track {} could not be resolved, keeping current session", track_id);
            return Err(PlaybackError::Unresolvable(track_id));
        };

        self.start_session(track_id, track)
    }

    /// Move CurrentIndex to `index` and play that track
    pub fn play_at(&mut self, index: usize) -> Result<()> {
        let track_id = self
            .queue
            .select(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.emit_queue_changed();
        self.play_track(track_id)
    }

    /// Pause if playing, resume if paused; no-op without a session
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        let Some(active) = self.session.as_mut() else {
            return Ok(());
        };

        let (result, next_state) = match self.state {
            PlaybackState::Playing => (active.media.pause(), PlaybackState::Paused),
            PlaybackState::Paused | PlaybackState::Loaded => {
                (active.media.play(), PlaybackState::Playing)
            }
            PlaybackState::Idle => return Ok(()),
        };

        match result {
            Ok(()) => {
                self.set_state(next_state);
                Ok(())
            }
            Err(e) => Err(self.fail_session(e)),
        }
    }

    /// Advance to the next track, wrapping at the end of the queue
    ///
    /// With shuffle on, the queue is reshuffled on every call before moving.
    pub fn play_next(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        if self.shuffled {
            self.queue.shuffle_with(&mut self.rng);
        }
        self.queue.advance();
        self.emit_queue_changed();

        match self.queue.current() {
            Some(track_id) => self.play_track(track_id),
            None => Ok(()),
        }
    }

    /// Step back to the previous track, wrapping at the start; never reshuffles
    pub fn play_previous(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        self.queue.retreat();
        self.emit_queue_changed();

        match self.queue.current() {
            Some(track_id) => self.play_track(track_id),
            None => Ok(()),
        }
    }

    /// Release the session and go idle, keeping the queue
    pub fn stop(&mut self) {
        self.release_session();
        self.set_state(PlaybackState::Idle);
    }

    // ===== Seek =====

    /// Seek the active session; positions past the end clamp to the end
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let active = self
            .session
            .as_mut()
            .ok_or(PlaybackError::NoActiveSession)?;

        let target = position.min(active.media.duration());
        if let Err(e) = active.media.seek(target) {
            return Err(self.fail_session(e));
        }

        self.emit_position_update();
        Ok(())
    }

    /// Seek by fraction of the track (clamped to `[0, 1]`)
    pub fn seek_percent(&mut self, fraction: f32) -> Result<()> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };

        let duration = self
            .session
            .as_ref()
            .map(|active| active.media.duration())
            .ok_or(PlaybackError::NoActiveSession)?;

        self.seek(duration.mul_f32(fraction))
    }

    // ===== Volume =====

    /// Set volume; out-of-range values are clamped
    ///
    /// Returns the level actually applied. It becomes the default for future
    /// sessions and is pushed to the active session right away.
    pub fn set_volume(&mut self, level: f32) -> f32 {
        let applied = self.volume.set_level(level);
        if let Some(active) = self.session.as_mut() {
            active.media.set_volume(applied);
        }
        debug!("Volume set to {}%", self.volume.percent());
        self.events
            .publish(PlaybackEvent::VolumeChanged { level: applied });
        applied
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    // ===== Queue Management =====

    /// Replace the queue; CurrentIndex is clamped, nothing starts playing
    pub fn set_queue(&mut self, tracks: Vec<TrackId>) {
        self.queue.set(tracks);
        self.emit_queue_changed();
    }

    pub fn add_to_queue(&mut self, track_id: TrackId) {
        self.queue.push(track_id);
        self.emit_queue_changed();
    }

    /// Remove the first occurrence of `track_id`
    ///
    /// Returns `false` if it was not queued. The active session keeps playing
    /// even when its track is the one removed.
    pub fn remove_from_queue(&mut self, track_id: TrackId) -> bool {
        let removed = self.queue.remove_first(track_id).is_some();
        if removed {
            self.emit_queue_changed();
        }
        removed
    }

    /// Empty the queue, reset CurrentIndex to 0 and release the session
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.release_session();
        self.set_state(PlaybackState::Idle);
        self.emit_queue_changed();
    }

    /// The queue in play order
    pub fn queue(&self) -> &[TrackId] {
        self.queue.as_slice()
    }

    /// CurrentIndex, `None` while the queue is empty
    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    // ===== Loop & Shuffle =====

    /// Loop the current track instead of advancing at end of media
    ///
    /// Only affects end-of-media notifications handled after this call.
    pub fn set_looped(&mut self, enabled: bool) {
        self.looped = enabled;
        self.events.publish(PlaybackEvent::LoopChanged { enabled });
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Enable or disable shuffle
    ///
    /// Enabling shuffles the queue in place immediately. Disabling keeps the
    /// current order; the pre-shuffle order is not remembered.
    pub fn set_shuffled(&mut self, enabled: bool) {
        self.shuffled = enabled;
        if enabled {
            self.queue.shuffle_with(&mut self.rng);
            self.emit_queue_changed();
        }
        self.events
            .publish(PlaybackEvent::ShuffleChanged { enabled });
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    // ===== Backend Notifications =====

    /// End-of-media transition for `session`
    ///
    /// Notifications for any session other than the active one are stale
    /// (the session was replaced while the notification was in flight) and
    /// are ignored.
    pub fn handle_end_of_media(&mut self, session: SessionId) -> Result<()> {
        let Some(active) = self.session.as_mut() else {
            debug!("End of media for {} with no active session, ignoring", session);
            return Ok(());
        };
        if active.id != session {
            debug!("Stale end of media for {} (active {}), ignoring", session, active.id);
            return Ok(());
        }

        let finished = active.track_id;
        self.events
            .publish(PlaybackEvent::TrackFinished { track_id: finished });

        if self.looped {
            debug!("Looping track {}", finished);
            let restart = active
                .media
                .seek(Duration::ZERO)
                .and_then(|()| active.media.play());
            if let Err(e) = restart {
                return Err(self.fail_session(e));
            }
            self.set_state(PlaybackState::Playing);
            self.emit_position_update();
            return Ok(());
        }

        if self.queue.is_empty() {
            info!("Track {} finished and the queue is empty", finished);
            self.stop();
            return Ok(());
        }

        self.play_next()
    }

    /// Backend fault for `session`: release it and go idle, no retry
    pub fn handle_media_error(&mut self, session: SessionId, message: &str) {
        if self.session_id() != Some(session) {
            debug!("Stale media error for {}: {}", session, message);
            return;
        }

        warn!("Media error in session {}: {}", session, message);
        self.release_session();
        self.set_state(PlaybackState::Idle);
        self.events.publish(PlaybackEvent::Error {
            message: message.to_string(),
        });
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Id of the live session, if any
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|active| active.id)
    }

    /// Track id of the live session
    pub fn current_track_id(&self) -> Option<TrackId> {
        self.session.as_ref().map(|active| active.track_id)
    }

    /// Metadata of the live session (now-playing panel)
    pub fn current_track(&self) -> Option<&ResolvedTrack> {
        self.session.as_ref().map(|active| &active.track)
    }

    pub fn position(&self) -> Duration {
        self.session
            .as_ref()
            .map(|active| active.media.position())
            .unwrap_or(Duration::ZERO)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.session.as_ref().map(|active| active.media.duration())
    }

    /// Everything a view needs to render, in one owned value
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            queue: self.queue.as_slice().to_vec(),
            current_index: self.queue.current_index(),
            current_track_id: self.current_track_id(),
            current_track: self.current_track().cloned(),
            position_ms: self.position().as_millis() as u64,
            duration_ms: self.duration().unwrap_or_default().as_millis() as u64,
            volume: self.volume.level(),
            looped: self.looped,
            shuffled: self.shuffled,
        }
    }

    // ===== Events =====

    /// Subscribe to playback events
    pub fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    /// Shared handle to the event fan-out (for subscribing from other threads)
    pub fn event_hub(&self) -> EventHub {
        self.events.clone()
    }

    /// Publish the current position; silent without a session
    pub fn emit_position_update(&self) {
        if let Some(active) = self.session.as_ref() {
            self.events.publish(PlaybackEvent::PositionChanged {
                position_ms: active.media.position().as_millis() as u64,
                duration_ms: active.media.duration().as_millis() as u64,
            });
        }
    }

    // ===== Internals =====

    fn start_session(&mut self, track_id: TrackId, track: ResolvedTrack) -> Result<()> {
        // At most one live session: the old one goes before the new one opens
        self.release_session();

        let id = SessionId::new(self.next_session_id);
        self.next_session_id += 1;

        let mut media = match self.backend.open(&track, id, self.notifier.clone()) {
            Ok(media) => media,
            Err(e) => {
                warn!("Could not open {}: {}", track.source.describe(), e);
                self.set_state(PlaybackState::Idle);
                return Err(e);
            }
        };
        self.set_state(PlaybackState::Loaded);

        media.set_volume(self.volume.level());
        if let Err(e) = media.play() {
            warn!("Could not start session {}: {}", id, e);
            media.release();
            self.set_state(PlaybackState::Idle);
            return Err(e);
        }

        info!(
            "Playing track {} \"{}\" by {} (session {})",
            track_id, track.display_name, track.artist_name, id
        );
        self.events.publish(PlaybackEvent::TrackChanged {
            track_id,
            session: id,
            display_name: track.display_name.clone(),
            artist_name: track.artist_name.clone(),
            duration_ms: track.duration().as_millis() as u64,
        });

        self.session = Some(ActiveSession {
            id,
            track_id,
            track,
            media,
        });
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    fn release_session(&mut self) {
        if let Some(mut active) = self.session.take() {
            debug!("Releasing session {} (track {})", active.id, active.track_id);
            active.media.release();
        }
    }

    /// Tear down after a backend call failed mid-session
    fn fail_session(&mut self, error: PlaybackError) -> PlaybackError {
        warn!("Media session failed: {}", error);
        self.release_session();
        self.set_state(PlaybackState::Idle);
        error
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.events.publish(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_queue_changed(&self) {
        self.events.publish(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            current_index: self.queue.current_index(),
        });
    }
}
