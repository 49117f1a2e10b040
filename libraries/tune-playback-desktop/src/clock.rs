//! Wall-clock media backend
//!
//! Sessions that produce no sound: position advances with real time (scaled
//! by `speed`) while playing, and a per-session timer thread reports end of
//! media through the notifier. Enough to drive the whole engine state machine
//! in a real process without an audio device.
//!
//! ```text
//! Service Thread                 Session Timer Thread
//!       │  play / pause / seek          │
//!       │──────── notify_all ──────────>│ recompute time left
//!       │                               │ wait_timeout(remaining)
//!       │    EndOfMedia(session)        │
//!       │<──────── notifier ────────────│
//! ```

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;
use tune_core::ResolvedTrack;
use tune_playback::{
    MediaBackend, MediaNotifier, MediaSession, PlaybackError, Result, SessionId,
};

/// Slowest supported clock speed
pub const MIN_SPEED: f32 = 0.01;

/// Fastest supported clock speed
pub const MAX_SPEED: f32 = 1000.0;

/// Backend producing [`ClockSession`]s
#[derive(Debug, Clone)]
pub struct ClockBackend {
    speed: f32,
}

impl ClockBackend {
    /// Real-time backend
    pub fn new() -> Self {
        Self { speed: 1.0 }
    }

    /// Media time runs `speed` times faster than wall time
    ///
    /// Non-positive or non-finite factors fall back to real time; others are
    /// clamped to `[MIN_SPEED, MAX_SPEED]`.
    pub fn with_speed(speed: f32) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            1.0
        };
        Self { speed }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl Default for ClockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for ClockBackend {
    fn open(
        &mut self,
        track: &ResolvedTrack,
        session: SessionId,
        notifier: MediaNotifier,
    ) -> Result<Box<dyn MediaSession>> {
        let duration = track.duration();
        if duration.is_zero() {
            return Err(PlaybackError::media(format!(
                "{} has no duration",
                track.source.describe()
            )));
        }

        let shared = Arc::new(Shared {
            clock: Mutex::new(Clock {
                duration,
                speed: self.speed,
                base: Duration::ZERO,
                started_at: None,
                released: false,
            }),
            changed: Condvar::new(),
        });

        let timer_shared = Arc::clone(&shared);
        thread::Builder::new()
            .name(format!("tune-clock-{}", session.get()))
            .spawn(move || run_timer(&timer_shared, session, &notifier))
            .map_err(|e| PlaybackError::media(format!("Failed to spawn clock timer: {}", e)))?;

        debug!("Opened clock session {} for {}", session, track.source.describe());
        Ok(Box::new(ClockSession { shared }))
    }
}

struct Clock {
    duration: Duration,
    speed: f32,
    /// Media position when the clock last stopped or was seeked
    base: Duration,
    /// Wall time playback (re)started; `None` while paused
    started_at: Option<Instant>,
    released: bool,
}

impl Clock {
    fn position(&self) -> Duration {
        let Some(at) = self.started_at else {
            return self.base.min(self.duration);
        };
        // Past what a Duration can hold means past the end
        let scaled = at.elapsed().as_secs_f64() * f64::from(self.speed);
        let running = Duration::try_from_secs_f64(scaled).unwrap_or(self.duration);
        self.base.saturating_add(running).min(self.duration)
    }

    /// Wall time until the end of media at the current speed
    fn time_left(&self) -> Duration {
        let remaining = self.duration.saturating_sub(self.position());
        Duration::try_from_secs_f64(remaining.as_secs_f64() / f64::from(self.speed))
            .unwrap_or(remaining)
    }

    fn freeze(&mut self) {
        self.base = self.position();
        self.started_at = None;
    }
}

struct Shared {
    clock: Mutex<Clock>,
    changed: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut Clock)) {
        f(&mut *self.lock());
        self.changed.notify_all();
    }
}

fn run_timer(shared: &Shared, session: SessionId, notifier: &MediaNotifier) {
    let mut clock = shared.lock();
    loop {
        if clock.released {
            break;
        }

        if clock.started_at.is_none() {
            clock = shared
                .changed
                .wait(clock)
                .unwrap_or_else(PoisonError::into_inner);
            continue;
        }

        let remaining = clock.duration.saturating_sub(clock.position());
        if remaining.is_zero() {
            clock.freeze();
            drop(clock);
            debug!("Clock session {} reached the end", session);
            notifier.end_of_media(session);
            clock = shared.lock();
            continue;
        }

        let timeout = clock.time_left();
        clock = shared
            .changed
            .wait_timeout(clock, timeout)
            .unwrap_or_else(PoisonError::into_inner)
            .0;
    }
}

/// Silent session driven by the wall clock
pub struct ClockSession {
    shared: Arc<Shared>,
}

impl MediaSession for ClockSession {
    fn play(&mut self) -> Result<()> {
        self.shared.update(|clock| {
            if clock.started_at.is_none() {
                clock.started_at = Some(Instant::now());
            }
        });
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.shared.update(Clock::freeze);
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.shared.update(|clock| {
            clock.base = position.min(clock.duration);
            if clock.started_at.is_some() {
                clock.started_at = Some(Instant::now());
            }
        });
        Ok(())
    }

    fn position(&self) -> Duration {
        self.shared.lock().position()
    }

    fn duration(&self) -> Duration {
        self.shared.lock().duration
    }

    fn set_volume(&mut self, _level: f32) {}

    fn release(&mut self) {
        self.shared.update(|clock| {
            clock.freeze();
            clock.released = true;
        });
    }
}

impl Drop for ClockSession {
    fn drop(&mut self) {
        self.release();
    }
}
