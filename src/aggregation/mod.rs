pub mod classify;
pub mod summarize;

pub use classify::{classify, FocusLevel, LevelCounts, FOCUSED_THRESHOLD, MODERATE_THRESHOLD};
pub use summarize::{duration_label, summarize};
