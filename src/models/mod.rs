mod sample;
mod session;
mod summary;

pub use sample::{AttentionSample, MAX_SCORE, MIN_SCORE};
pub use session::{
    format_remaining, progress_percent, LiveState, SessionConfig, SessionState,
    DEFAULT_SAMPLING_INTERVAL_SECS, DEFAULT_STUDY_MODE, STUDY_MODES,
};
pub use summary::{FocusDistribution, SessionSummary};
