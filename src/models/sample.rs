use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SampleError;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// One attention score, stamped when its round trip was initiated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttentionSample {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
}

impl AttentionSample {
    pub fn new(timestamp: DateTime<Utc>, score: f64) -> Result<Self, SampleError> {
        if !score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(SampleError::ScoreOutOfRange(score));
        }
        Ok(Self { timestamp, score })
    }
}
