//! Volume level with clamping
//!
//! The store player exposes a linear 0.0-1.0 slider and hands the value
//! straight to the media backend. Out-of-range input is clamped, never
//! rejected, so the slider can overshoot without errors.

/// Volume level in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
}

impl Volume {
    /// Create a volume level, clamping into range
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level),
        }
    }

    /// Set the level and return the value actually applied
    pub fn set_level(&mut self, level: f32) -> f32 {
        self.level = Self::clamp(level);
        self.level
    }

    /// Current level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Level as a 0-100 percentage for display
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }

    /// NaN maps to silence; infinities clamp to the nearest bound.
    fn clamp(level: f32) -> f32 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.8)
    }
}
