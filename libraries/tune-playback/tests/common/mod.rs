//! Shared helpers for tune-playback integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tune_core::{ResolvedTrack, SourceHandle, TrackId, TrackResolver};
use tune_playback::{
    MediaBackend, MediaNotifier, MediaSession, PlaybackConfig, PlaybackEngine, Result, SessionId,
};

pub fn id(n: i64) -> TrackId {
    TrackId::new(n)
}

/// Resolver that knows a fixed set of ids
pub struct MapResolver {
    tracks: HashMap<TrackId, ResolvedTrack>,
}

impl MapResolver {
    pub fn with_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let tracks = ids
            .into_iter()
            .map(|n| {
                (
                    id(n),
                    ResolvedTrack {
                        source: SourceHandle::Uri(format!("mem://{}", n)),
                        display_name: format!("Track {}", n),
                        artist_name: "Artist".to_string(),
                        duration_seconds: 120,
                    },
                )
            })
            .collect();
        Self { tracks }
    }
}

impl TrackResolver for MapResolver {
    fn resolve(&self, track_id: TrackId) -> Option<ResolvedTrack> {
        self.tracks.get(&track_id).cloned()
    }
}

/// What the backend was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Open(SessionId, String),
    Play(SessionId),
    Pause(SessionId),
    Seek(SessionId, Duration),
    Volume(SessionId, f32),
    Release(SessionId),
}

#[derive(Default)]
pub struct Recorder {
    ops: Mutex<Vec<Op>>,
    live: Mutex<Vec<SessionId>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<Op> {
        std::mem::take(&mut *self.ops.lock().unwrap())
    }

    /// Sessions opened and not yet released
    pub fn live_sessions(&self) -> Vec<SessionId> {
        self.live.lock().unwrap().clone()
    }

    fn record(&self, op: Op) {
        match &op {
            Op::Open(session, _) => self.live.lock().unwrap().push(*session),
            Op::Release(session) => self.live.lock().unwrap().retain(|s| s != session),
            _ => {}
        }
        self.ops.lock().unwrap().push(op);
    }
}

/// Backend that records every call
pub struct RecordingBackend {
    recorder: Arc<Recorder>,
}

impl MediaBackend for RecordingBackend {
    fn open(
        &mut self,
        track: &ResolvedTrack,
        session: SessionId,
        _notifier: MediaNotifier,
    ) -> Result<Box<dyn MediaSession>> {
        self.recorder
            .record(Op::Open(session, track.source.describe()));
        Ok(Box::new(RecordingSession {
            id: session,
            recorder: Arc::clone(&self.recorder),
            position: Duration::ZERO,
            duration: track.duration(),
        }))
    }
}

struct RecordingSession {
    id: SessionId,
    recorder: Arc<Recorder>,
    position: Duration,
    duration: Duration,
}

impl MediaSession for RecordingSession {
    fn play(&mut self) -> Result<()> {
        self.recorder.record(Op::Play(self.id));
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.recorder.record(Op::Pause(self.id));
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.recorder.record(Op::Seek(self.id, position));
        self.position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn set_volume(&mut self, level: f32) {
        self.recorder.record(Op::Volume(self.id, level));
    }

    fn release(&mut self) {
        self.recorder.record(Op::Release(self.id));
    }
}

pub struct Harness {
    pub engine: PlaybackEngine,
    pub recorder: Arc<Recorder>,
}

impl Harness {
    /// Engine over tracks `1..=count`, fixed shuffle seed
    pub fn new(count: i64) -> Self {
        Self::with_config(count, PlaybackConfig::default())
    }

    pub fn with_config(count: i64, config: PlaybackConfig) -> Self {
        let recorder = Arc::new(Recorder::default());
        let backend = RecordingBackend {
            recorder: Arc::clone(&recorder),
        };
        let engine = PlaybackEngine::new(
            &config,
            Arc::new(MapResolver::with_ids(1..=count)),
            Box::new(backend),
            MediaNotifier::noop(),
        )
        .with_shuffle_seed(99);

        Self { engine, recorder }
    }

    /// Queue `ids` and start playing index 0
    pub fn play_queue(&mut self, ids: &[i64]) {
        self.engine.set_queue(ids.iter().copied().map(id).collect());
        self.engine.play_at(0).unwrap();
    }

    /// Deliver end of media for the active session, as the backend would
    pub fn finish_current(&mut self) {
        let session = self.engine.session_id().expect("no active session");
        self.engine.handle_end_of_media(session).unwrap();
    }
}
