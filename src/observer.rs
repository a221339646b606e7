//! Event sink for the engine.
//!
//! Every method has a no-op default so hosts only implement what they render.
//! Calls happen on runtime worker threads and must not block.

use crate::{
    error::{CaptureError, SampleError},
    models::{AttentionSample, SessionSummary},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

pub trait SessionObserver: Send + Sync {
    fn on_tick(&self, _remaining_secs: u64) {}

    fn on_sample(&self, _sample: &AttentionSample) {}

    /// A round trip failed; the tick is skipped and sampling continues.
    fn on_sample_failed(&self, _tick: u64, _error: &SampleError) {}

    /// A round trip resolved after sampling was stopped; its result was dropped.
    fn on_sample_discarded(&self, _tick: u64) {}

    /// The session is running without a capture handle.
    fn on_capture_unavailable(&self, _error: &CaptureError) {}

    fn on_capture_release_failed(&self, _error: &CaptureError) {}

    fn on_ended(&self, _summary: &SessionSummary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Observer that writes engine events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl SessionObserver for LoggingObserver {
    fn on_tick(&self, remaining_secs: u64) {
        if remaining_secs % 60 == 0 {
            log_info!("{} min remaining", remaining_secs / 60);
        }
    }

    fn on_sample(&self, sample: &AttentionSample) {
        log_debug!("attention sample {:.2} at {}", sample.score, sample.timestamp);
    }

    fn on_sample_failed(&self, tick: u64, error: &SampleError) {
        log_warn!("sampling tick {} failed: {}", tick, error);
    }

    fn on_sample_discarded(&self, tick: u64) {
        log_debug!("discarded stale result from tick {}", tick);
    }

    fn on_capture_unavailable(&self, error: &CaptureError) {
        log_warn!("continuing without camera: {}", error);
    }

    fn on_capture_release_failed(&self, error: &CaptureError) {
        log_warn!("failed to release camera: {}", error);
    }

    fn on_ended(&self, summary: &SessionSummary) {
        log_info!(
            "session ended: avg {} over {} samples, {}% focused",
            summary.average_score,
            summary.series.len(),
            summary.time_focused_percent
        );
    }
}
