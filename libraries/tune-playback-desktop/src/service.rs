//! Threaded playback service
//!
//! Confines a [`PlaybackEngine`] to one dedicated thread. Callers talk to it
//! with fire-and-forget [`PlaybackCommand`]s over a bounded channel; media
//! notifications from backend threads are posted into the same channel, so
//! the engine only ever runs on the playback thread.
//!
//! ```text
//! UI / CLI Thread            Playback Thread            Backend Thread
//!       │  PlaybackCommand          │                          │
//!       │──────────────────────────>│ engine.<operation>()     │
//!       │                           │                          │
//!       │                           │ EndOfMedia(session)      │
//!       │                           │<─────────────────────────│
//!       │  PlaybackEvent            │                          │
//!       │<──────────────────────────│ (EventHub subscription)  │
//! ```

use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};
use tune_core::{TrackId, TrackResolver};
use tune_playback::{
    EventHub, MediaBackend, MediaNotification, MediaNotifier, PlaybackConfig, PlaybackEngine,
    PlaybackEvent, PlaybackSnapshot, SessionId, Subscription,
};

use crate::error::{Result, ServiceError};

/// Commands sent to the playback thread
#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    /// Play a track by id (does not move the queue cursor)
    PlayTrack(TrackId),

    /// Play the queue entry at this index
    PlayAt(usize),

    /// Replace the queue
    SetQueue(Vec<TrackId>),

    /// Append a track to the queue
    AddToQueue(TrackId),

    /// Remove the first occurrence of a track
    RemoveFromQueue(TrackId),

    /// Empty the queue and stop
    ClearQueue,

    /// Pause if playing, resume if paused
    TogglePlayPause,

    /// Skip to next track
    Next,

    /// Go to previous track
    Previous,

    /// Seek to position
    Seek(Duration),

    /// Seek to fraction of the track (0.0-1.0)
    SeekPercent(f32),

    /// Set volume (0.0-1.0, clamped)
    SetVolume(f32),

    SetLooped(bool),

    SetShuffled(bool),

    /// Release the session, keep the queue
    Stop,

    /// Backend: session reached its end
    EndOfMedia(SessionId),

    /// Backend: session failed
    MediaError { session: SessionId, message: String },

    /// Reply with a snapshot of the engine state
    Snapshot(Sender<PlaybackSnapshot>),

    /// Stop the playback thread
    Shutdown,
}

impl From<MediaNotification> for PlaybackCommand {
    fn from(notification: MediaNotification) -> Self {
        match notification {
            MediaNotification::EndOfMedia(session) => PlaybackCommand::EndOfMedia(session),
            MediaNotification::Error { session, message } => {
                PlaybackCommand::MediaError { session, message }
            }
        }
    }
}

/// Name of the thread that owns the engine
const PLAYBACK_THREAD: &str = "tune-playback";

/// Handle to the playback thread
///
/// Dropping the handle shuts the thread down and releases the session.
pub struct PlaybackService {
    command_tx: Sender<PlaybackCommand>,
    events: EventHub,
    thread: Option<JoinHandle<()>>,
}

impl PlaybackService {
    /// Build the engine and start the playback thread
    pub fn spawn(
        config: &PlaybackConfig,
        resolver: Arc<dyn TrackResolver>,
        backend: Box<dyn MediaBackend>,
    ) -> Result<Self> {
        let (command_tx, command_rx) = bounded::<PlaybackCommand>(config.command_buffer.max(1));

        // Backend threads post notifications back as commands. A backend
        // notifying from inside open/play runs on the playback thread itself,
        // which must never block on its own channel.
        let notify_tx = command_tx.clone();
        let notifier = MediaNotifier::new(move |notification| {
            let session = notification.session();
            let command = PlaybackCommand::from(notification);
            let sent = if thread::current().name() == Some(PLAYBACK_THREAD) {
                notify_tx.try_send(command)
            } else {
                notify_tx
                    .send(command)
                    .map_err(|e| TrySendError::Disconnected(e.into_inner()))
            };
            match sent {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(
                        "Command channel full, dropping media notification for session {}",
                        session
                    );
                }
                Err(TrySendError::Disconnected(_)) => {
                    debug!("Playback thread gone, dropping media notification");
                }
            }
        });

        let engine = PlaybackEngine::new(config, resolver, backend, notifier);
        let events = engine.event_hub();
        let interval = Duration::from_millis(config.position_interval_ms.max(1));

        let thread = thread::Builder::new()
            .name(PLAYBACK_THREAD.to_string())
            .spawn(move || Self::playback_thread(engine, &command_rx, interval))?;

        info!("Playback service started");

        Ok(Self {
            command_tx,
            events,
            thread: Some(thread),
        })
    }

    /// Playback thread main loop
    fn playback_thread(
        mut engine: PlaybackEngine,
        command_rx: &Receiver<PlaybackCommand>,
        interval: Duration,
    ) {
        let ticker = tick(interval);

        loop {
            select! {
                recv(command_rx) -> command => match command {
                    Ok(PlaybackCommand::Shutdown) | Err(_) => break,
                    Ok(command) => {
                        if let Err(e) = Self::process_command(&mut engine, command) {
                            warn!("Command failed: {}", e);
                            engine.event_hub().publish(PlaybackEvent::Error {
                                message: format!("Command error: {}", e),
                            });
                        }
                    }
                },
                recv(ticker) -> _ => {
                    if engine.is_playing() {
                        engine.emit_position_update();
                    }
                }
            }
        }

        engine.stop();
        info!("Playback thread stopped");
    }

    /// Apply one command to the engine
    fn process_command(
        engine: &mut PlaybackEngine,
        command: PlaybackCommand,
    ) -> tune_playback::Result<()> {
        match command {
            PlaybackCommand::PlayTrack(track_id) => engine.play_track(track_id)?,
            PlaybackCommand::PlayAt(index) => engine.play_at(index)?,
            PlaybackCommand::SetQueue(tracks) => engine.set_queue(tracks),
            PlaybackCommand::AddToQueue(track_id) => engine.add_to_queue(track_id),
            PlaybackCommand::RemoveFromQueue(track_id) => {
                if !engine.remove_from_queue(track_id) {
                    debug!("Track {} not in queue", track_id);
                }
            }
            PlaybackCommand::ClearQueue => engine.clear_queue(),
            PlaybackCommand::TogglePlayPause => engine.toggle_play_pause()?,
            PlaybackCommand::Next => engine.play_next()?,
            PlaybackCommand::Previous => engine.play_previous()?,
            PlaybackCommand::Seek(position) => engine.seek(position)?,
            PlaybackCommand::SeekPercent(fraction) => engine.seek_percent(fraction)?,
            PlaybackCommand::SetVolume(level) => {
                engine.set_volume(level);
            }
            PlaybackCommand::SetLooped(enabled) => engine.set_looped(enabled),
            PlaybackCommand::SetShuffled(enabled) => engine.set_shuffled(enabled),
            PlaybackCommand::Stop => engine.stop(),
            PlaybackCommand::EndOfMedia(session) => engine.handle_end_of_media(session)?,
            PlaybackCommand::MediaError { session, message } => {
                engine.handle_media_error(session, &message);
            }
            PlaybackCommand::Snapshot(reply) => {
                // Requester may have given up waiting
                reply.send(engine.snapshot()).ok();
            }
            PlaybackCommand::Shutdown => {}
        }

        Ok(())
    }

    // Public API

    /// Send command to playback thread
    pub fn send_command(&self, command: PlaybackCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| ServiceError::Disconnected)
    }

    pub fn play_track(&self, track_id: TrackId) -> Result<()> {
        self.send_command(PlaybackCommand::PlayTrack(track_id))
    }

    pub fn play_at(&self, index: usize) -> Result<()> {
        self.send_command(PlaybackCommand::PlayAt(index))
    }

    pub fn set_queue(&self, tracks: Vec<TrackId>) -> Result<()> {
        self.send_command(PlaybackCommand::SetQueue(tracks))
    }

    pub fn add_to_queue(&self, track_id: TrackId) -> Result<()> {
        self.send_command(PlaybackCommand::AddToQueue(track_id))
    }

    pub fn remove_from_queue(&self, track_id: TrackId) -> Result<()> {
        self.send_command(PlaybackCommand::RemoveFromQueue(track_id))
    }

    pub fn clear_queue(&self) -> Result<()> {
        self.send_command(PlaybackCommand::ClearQueue)
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send_command(PlaybackCommand::TogglePlayPause)
    }

    pub fn play_next(&self) -> Result<()> {
        self.send_command(PlaybackCommand::Next)
    }

    pub fn play_previous(&self) -> Result<()> {
        self.send_command(PlaybackCommand::Previous)
    }

    pub fn seek(&self, position: Duration) -> Result<()> {
        self.send_command(PlaybackCommand::Seek(position))
    }

    pub fn seek_percent(&self, fraction: f32) -> Result<()> {
        self.send_command(PlaybackCommand::SeekPercent(fraction))
    }

    pub fn set_volume(&self, level: f32) -> Result<()> {
        self.send_command(PlaybackCommand::SetVolume(level))
    }

    pub fn set_looped(&self, enabled: bool) -> Result<()> {
        self.send_command(PlaybackCommand::SetLooped(enabled))
    }

    pub fn set_shuffled(&self, enabled: bool) -> Result<()> {
        self.send_command(PlaybackCommand::SetShuffled(enabled))
    }

    pub fn stop(&self) -> Result<()> {
        self.send_command(PlaybackCommand::Stop)
    }

    /// Current engine state (blocks until the playback thread answers)
    ///
    /// Commands sent earlier from this thread are applied first.
    pub fn snapshot(&self) -> Result<PlaybackSnapshot> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send_command(PlaybackCommand::Snapshot(reply_tx))?;
        reply_rx.recv().map_err(|_| ServiceError::Disconnected)
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    /// Sender for posting commands from other threads
    pub fn command_sender(&self) -> Sender<PlaybackCommand> {
        self.command_tx.clone()
    }

    /// Stop the playback thread and wait for it
    pub fn shutdown(mut self) -> Result<()> {
        self.stop_thread()
    }

    fn stop_thread(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        // Already gone if the thread panicked
        self.command_tx.send(PlaybackCommand::Shutdown).ok();
        thread.join().map_err(|_| ServiceError::ThreadPanicked)
    }
}

impl Drop for PlaybackService {
    fn drop(&mut self) {
        if let Err(e) = self.stop_thread() {
            warn!("Playback service shutdown failed: {}", e);
        }
    }
}

impl std::fmt::Debug for PlaybackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackService")
            .field("running", &self.thread.is_some())
            .field("pending_commands", &self.command_tx.len())
            .finish()
    }
}
