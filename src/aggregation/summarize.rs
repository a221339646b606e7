use crate::models::{AttentionSample, FocusDistribution, SessionConfig, SessionSummary};

use super::classify::LevelCounts;

/// Below this share of focused samples the summary suggests shorter sessions.
const GOOD_SESSION_FOCUSED_PCT: u32 = 50;

const IMPROVE_RECOMMENDATION: &str = "Let's improve! Start with shorter 15-minute sessions and \
     gradually increase duration as your focus improves.";

/// Turn a session's attention series into its summary.
///
/// Pure: the same series and config always produce the same summary. An empty
/// series yields zeros everywhere rather than dividing by zero.
pub fn summarize(series: &[AttentionSample], config: &SessionConfig) -> SessionSummary {
    let total_duration_label = duration_label(config.duration_minutes);

    if series.is_empty() {
        return SessionSummary {
            average_score: 0,
            total_duration_label,
            time_focused_percent: 0,
            focus_distribution: FocusDistribution::default(),
            series: Vec::new(),
            recommendation: recommendation(0, 0, config.duration_minutes),
        };
    }

    let total: f64 = series.iter().map(|s| s.score).sum();
    let average_score = (total / series.len() as f64).round() as u32;

    let counts = LevelCounts::from_scores(series.iter().map(|s| s.score));
    let focus_distribution = FocusDistribution {
        focused_pct: percent(counts.focused, counts.total()),
        moderate_pct: percent(counts.moderate, counts.total()),
        distracted_pct: percent(counts.distracted, counts.total()),
    };
    let time_focused_percent = focus_distribution.focused_pct;

    SessionSummary {
        average_score,
        total_duration_label,
        time_focused_percent,
        focus_distribution,
        series: series.to_vec(),
        recommendation: recommendation(series.len(), time_focused_percent, config.duration_minutes),
    }
}

/// Label for the configured (not elapsed) session length.
pub fn duration_label(duration_minutes: u32) -> String {
    format!("{duration_minutes} min")
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * count as f64 / total as f64).round() as u32
}

fn recommendation(sample_count: usize, focused_pct: u32, duration_minutes: u32) -> String {
    if sample_count > 0 && focused_pct >= GOOD_SESSION_FOCUSED_PCT {
        format!("Great work! Keep practicing {duration_minutes}-min sessions.")
    } else {
        IMPROVE_RECOMMENDATION.to_string()
    }
}
