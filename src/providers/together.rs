use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{default_http_client, join_endpoint};
use crate::provider::ImageProvider;
use crate::types::{GenerationRequest, ProviderKind};
use crate::{PixfallError, Result};

const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

/// Hosted-model adapter: a single synchronous call against a managed
/// inference endpoint. Not retried; any transport or shape problem falls
/// through to the next provider in the chain.
#[derive(Clone)]
pub struct Together {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl Together {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: default_http_client(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
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
}

#[async_trait]
impl ImageProvider for Together {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Together
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = serde_json::json!({
            "model": request.model.as_str(),
            "prompt": request.prompt,
            "width": request.width,
            "height": request.height,
            "steps": request.model.steps(),
            "n": 1,
        });

        let response = self
            .http
            .post(join_endpoint(&self.base_url, "images/generations"))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PixfallError::Api { status, body: text });
        }

        let parsed = response.json::<ImagesResponse>().await?;
        parsed
            .data
            .into_iter()
            .find_map(|item| item.url.filter(|url| !url.trim().is_empty()))
            .ok_or_else(|| {
                PixfallError::InvalidResponse(
                    "together response contained no image url".to_string(),
                )
            })
    }
}
