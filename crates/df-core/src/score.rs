//! Satisfaction scores.
//!
//! A satisfaction score is a judge verdict in the closed interval `[0, 1]`.
//! Acceptance-criterion weights share the same bounds and reuse this type.
//! Out-of-range values are rejected both at construction and during
//! deserialization, so a score that exists is always valid.

use serde::{Deserialize, Serialize};

/// Error produced when a raw value falls outside `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("score {0} is outside [0.0, 1.0]")]
pub struct ScoreOutOfRange(pub f64);

/// A satisfaction score in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SatisfactionScore(f64);

impl SatisfactionScore {
    /// Lowest possible score.
    pub const MIN: Self = Self(0.0);
    /// Fixed mid-scale score (what the stub judge backend returns).
    pub const HALF: Self = Self(0.5);
    /// Highest possible score.
    pub const MAX: Self = Self(1.0);

    /// Create a score, rejecting values outside `[0.0, 1.0]` (NaN included).
    #[inline]
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Raw value.
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for SatisfactionScore {
    type Error = ScoreOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ScoreOutOfRange(value))
    }
}

impl From<SatisfactionScore> for f64 {
    fn from(score: SatisfactionScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for SatisfactionScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
