use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{default_http_client, join_endpoint};
use crate::provider::ImageProvider;
use crate::retry::PollPolicy;
use crate::types::{GenerationRequest, ProviderKind};
use crate::{PixfallError, Result};

const DEFAULT_BASE_URL: &str = "https://api.bfl.ml/v1";
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

const STATUS_READY: &str = "Ready";
const STATUS_ERROR: &str = "Error";

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result: Option<JobResult>,
}

#[derive(Debug, Deserialize)]
struct JobResult {
    #[serde(default)]
    sample: Option<String>,
}

/// Direct-API adapter with a two-phase protocol: submit a generation job,
/// then poll its status until a terminal `Ready`/`Error` or the poll bound
/// runs out. A non-2xx or unreachable poll response is ignored and merely
/// consumes an attempt; only a terminal status or exhaustion ends the loop.
#[derive(Clone)]
pub struct Bfl {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    poll: PollPolicy,
}

impl Bfl {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: default_http_client(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll: PollPolicy::default(),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<String> {
        let body = serde_json::json!({
            "prompt": request.prompt,
            "width": request.width,
            "height": request.height,
        });

        let response = self
            .http
            .post(join_endpoint(&self.base_url, "flux-pro-1.1"))
            .header("X-Key", &self.api_key)
            .timeout(SUBMIT_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PixfallError::Api { status, body: text });
        }

        let parsed = response.json::<SubmitResponse>().await?;
        parsed
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                PixfallError::InvalidResponse("bfl submit returned no job id".to_string())
            })
    }

    /// Polls the job until a terminal status. Never issues more than
    /// `poll.max_attempts` status requests, and never polls again after
    /// seeing `Ready` or `Error`.
    async fn poll_result(&self, job_id: &str) -> Result<String> {
        let url = join_endpoint(&self.base_url, "get_result");

        for attempt in 1..=self.poll.max_attempts {
            tokio::time::sleep(self.poll.interval).await;

            let response = match self
                .http
                .get(&url)
                .query(&[("id", job_id)])
                .header("X-Key", &self.api_key)
                .timeout(self.poll.attempt_timeout)
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    debug!(job_id, attempt, error = %err, "bfl poll attempt failed");
                    continue;
                }
            };

            if !response.status().is_success() {
                debug!(job_id, attempt, status = %response.status(), "bfl poll attempt rejected");
                continue;
            }

            let parsed = response.json::<JobStatusResponse>().await?;
            match parsed.status.as_deref() {
                Some(STATUS_READY) => {
                    if let Some(sample) = parsed
                        .result
                        .and_then(|r| r.sample)
                        .filter(|s| !s.trim().is_empty())
                    {
                        return Ok(sample);
                    }
                    // Ready without a sample: keep polling, the result
                    // field sometimes lags the status flip.
                }
                Some(STATUS_ERROR) => {
                    return Err(PixfallError::Generation(format!(
                        "bfl reported a failed generation for job {job_id}"
                    )));
                }
                _ => {}
            }
        }

        Err(PixfallError::PollTimeout {
            attempts: self.poll.max_attempts,
        })
    }
}

#[async_trait]
impl ImageProvider for Bfl {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bfl
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let job_id = self.submit(request).await?;
        debug!(job_id, "bfl job submitted");
        self.poll_result(&job_id).await
    }
}
