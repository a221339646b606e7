//! Session-related data models.
//!
//! - `SessionConfig`: what the host configures before `begin`
//! - `SessionState`: the engine's lifecycle state
//! - `LiveState`: what the host polls while a session runs

use serde::{Deserialize, Serialize};

use super::AttentionSample;

pub const DEFAULT_STUDY_MODE: &str = "Screen Work";
pub const DEFAULT_SAMPLING_INTERVAL_SECS: u64 = 2;

/// Study modes offered by the setup screen. The engine treats the mode as an
/// opaque label and forwards it to the scoring service.
pub const STUDY_MODES: [&str; 3] = ["Screen Work", "Writing", "Reading"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub duration_minutes: u32,
    pub study_mode: String,
    pub sampling_interval_secs: u64,
}

impl SessionConfig {
    pub fn new(duration_minutes: u32, study_mode: impl Into<String>) -> Self {
        Self {
            duration_minutes,
            study_mode: study_mode.into(),
            sampling_interval_secs: DEFAULT_SAMPLING_INTERVAL_SECS,
        }
    }

    pub fn with_sampling_interval(mut self, secs: u64) -> Self {
        self.sampling_interval_secs = secs;
        self
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }

    /// Check the values the engine relies on. The setup UI restricts duration
    /// to 10–60 minutes but any positive value is accepted here.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_minutes == 0 {
            return Err("duration_minutes must be greater than zero".into());
        }
        if self.sampling_interval_secs == 0 {
            return Err("sampling_interval_secs must be greater than zero".into());
        }
        if self.sampling_interval_secs > self.total_seconds() {
            return Err("sampling_interval_secs must not exceed the session length".into());
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(25, DEFAULT_STUDY_MODE)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    #[default]
    Configuring,
    Active,
    Ended,
}

/// Point-in-time view of a running session for the host to render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveState {
    pub state: SessionState,
    pub remaining_secs: u64,
    pub remaining_label: String,
    /// Elapsed share of the configured duration, 0–100.
    pub progress_percent: f64,
    pub latest_score: Option<f64>,
    pub running_average: Option<f64>,
    pub series: Vec<AttentionSample>,
}

/// Format seconds as `m:ss`, the way the live session screen shows them.
pub fn format_remaining(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Elapsed percentage of `total_secs` given `remaining_secs` left.
pub fn progress_percent(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 100.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    elapsed as f64 / total_secs as f64 * 100.0
}
