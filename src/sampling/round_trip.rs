use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    capture::{CaptureHandle, CaptureSource},
    error::SampleError,
    models::AttentionSample,
    scoring::{ScoreRequest, ScoringClient},
};

use super::SampleFn;

/// One capture + score round trip against the session's collaborators.
pub struct CaptureAndScore {
    capture: Arc<dyn CaptureSource>,
    scorer: Arc<dyn ScoringClient>,
    /// `None` when the camera could not be acquired; every round trip then
    /// fails at the capture step.
    handle: Option<Arc<CaptureHandle>>,
    study_mode: String,
}

impl CaptureAndScore {
    pub fn new(
        capture: Arc<dyn CaptureSource>,
        scorer: Arc<dyn ScoringClient>,
        handle: Option<Arc<CaptureHandle>>,
        study_mode: impl Into<String>,
    ) -> Self {
        Self {
            capture,
            scorer,
            handle,
            study_mode: study_mode.into(),
        }
    }
}

#[async_trait]
impl SampleFn for CaptureAndScore {
    async fn sample(&self) -> Result<AttentionSample, SampleError> {
        let timestamp = Utc::now();
        let handle = self
            .handle
            .as_ref()
            .ok_or(SampleError::CaptureUnavailable)?;

        let frame = self.capture.capture_frame(handle).await?;
        let request = ScoreRequest {
            image: frame.data,
            study_mode: self.study_mode.clone(),
        };
        let score = self.scorer.score(&request).await?;

        AttentionSample::new(timestamp, score)
    }
}
