use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::SampleError;

use super::{ScoreRequest, ScoreResponse, ScoringClient};

/// Scoring service reached over HTTP at `{base_url}/analyze-frame`.
pub struct HttpScoringClient {
    client: Client,
    base_url: String,
}

impl HttpScoringClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Build a client whose requests give up after `timeout`. A timed-out
    /// request is just another failed round trip.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SampleError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SampleError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/analyze-frame", self.base_url)
    }
}

#[async_trait]
impl ScoringClient for HttpScoringClient {
    async fn score(&self, request: &ScoreRequest) -> Result<f64, SampleError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| SampleError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SampleError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|e| SampleError::MalformedResponse(e.to_string()))?;

        body.into_score()
    }
}
