use serde::{Deserialize, Serialize};

use super::AttentionSample;

/// Share of samples in each focus bucket, each rounded on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FocusDistribution {
    pub focused_pct: u32,
    pub moderate_pct: u32,
    pub distracted_pct: u32,
}

/// End-of-session aggregates handed to the host exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub average_score: u32,
    pub total_duration_label: String,
    pub time_focused_percent: u32,
    pub focus_distribution: FocusDistribution,
    pub series: Vec<AttentionSample>,
    pub recommendation: String,
}
