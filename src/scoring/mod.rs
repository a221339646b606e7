//! Scoring collaborator contract.
//!
//! The service turns one encoded frame into an attention score; how it does
//! that is opaque to the engine.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SampleError;

pub use http::HttpScoringClient;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScoreRequest {
    pub image: String,
    pub study_mode: String,
}

/// Body returned by the scoring service. Only `attention_score` matters to the
/// engine; `error` is set when the service rejects the frame.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScoreResponse {
    #[serde(default)]
    pub attention_score: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ScoreResponse {
    pub fn into_score(self) -> Result<f64, SampleError> {
        if let Some(error) = self.error {
            return Err(SampleError::Service(error));
        }

        let value = self
            .attention_score
            .ok_or_else(|| SampleError::MalformedResponse("missing attention_score".into()))?;

        let score = value.as_f64().ok_or_else(|| {
            SampleError::MalformedResponse(format!("attention_score is not a number: {value}"))
        })?;

        if !(0.0..=100.0).contains(&score) {
            return Err(SampleError::ScoreOutOfRange(score));
        }
        Ok(score)
    }
}

#[async_trait]
pub trait ScoringClient: Send + Sync {
    async fn score(&self, request: &ScoreRequest) -> Result<f64, SampleError>;
}
