use super::domain::ScoreRejection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal judgment on the 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ScoreRejection> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ScoreRejection::OutOfRange(value))
        }
    }

    /// Accepts integral-valued numbers such as `4.0`.
    pub fn from_f64(value: f64) -> Result<Self, ScoreRejection> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ScoreRejection::NotIntegral(value));
        }
        Self::new(value as i64)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreRejection;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<f64> for Score {
    type Error = ScoreRejection;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        i64::from(score.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One judgment for one (stage, factor) pair. `None` means not assessed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCell {
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default)]
    pub note: String,
}

impl ScoreCell {
    pub fn is_known(&self) -> bool {
        self.score.is_some()
    }

    pub fn value(&self) -> Option<f64> {
        self.score.map(|score| f64::from(score.value()))
    }
}
