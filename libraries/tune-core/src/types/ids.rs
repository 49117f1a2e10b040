/// ID types for Tune Store entities
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Track identifier
///
/// Opaque integer key into the store catalog. Copyable so queues can hold
/// plain values instead of shared metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(i64);

impl TrackId {
    /// Create a new track ID
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw integer value
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for TrackId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let id: TrackId = " 42 ".parse().unwrap();
        assert_eq!(id, TrackId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<TrackId>().is_err());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&TrackId::new(9)).unwrap();
        assert_eq!(json, "9");

        let back: TrackId = serde_json::from_str("9").unwrap();
        assert_eq!(back.get(), 9);
    }
}
