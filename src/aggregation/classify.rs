use serde::{Deserialize, Serialize};

/// Scores at or above this are focused.
pub const FOCUSED_THRESHOLD: f64 = 70.0;
/// Scores at or above this (and below focused) are moderate.
pub const MODERATE_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FocusLevel {
    Focused,
    Moderate,
    Distracted,
}

pub fn classify(score: f64) -> FocusLevel {
    if score >= FOCUSED_THRESHOLD {
        FocusLevel::Focused
    } else if score >= MODERATE_THRESHOLD {
        FocusLevel::Moderate
    } else {
        FocusLevel::Distracted
    }
}

/// Per-level sample counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub focused: usize,
    pub moderate: usize,
    pub distracted: usize,
}

impl LevelCounts {
    pub fn from_scores(scores: impl IntoIterator<Item = f64>) -> Self {
        let mut counts = Self::default();
        for score in scores {
            match classify(score) {
                FocusLevel::Focused => counts.focused += 1,
                FocusLevel::Moderate => counts.moderate += 1,
                FocusLevel::Distracted => counts.distracted += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.focused + self.moderate + self.distracted
    }
}
