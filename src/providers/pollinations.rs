use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::default_http_client;
use crate::provider::ImageProvider;
use crate::types::{GenerationRequest, ProviderKind};
use crate::{PixfallError, Result};

const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SEED_SPACE: u32 = 1_000_000;

/// Key-free last-resort generator. Encodes the prompt and a fresh random
/// seed into the request URL, follows redirects, and returns the final
/// resolved URL. Two calls for the same prompt draw independent seeds, so
/// differing URLs are expected, not a fault.
#[derive(Clone)]
pub struct Pollinations {
    http: reqwest::Client,
    base_url: String,
}

impl Pollinations {
    pub fn new() -> Self {
        Self {
            http: default_http_client(),
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

    fn request_url(&self, request: &GenerationRequest, seed: u32) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|err| {
            PixfallError::InvalidResponse(format!("invalid pollinations base url: {err}"))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                PixfallError::InvalidResponse(
                    "pollinations base url cannot carry a path".to_string(),
                )
            })?
            .pop_if_empty()
            .push("prompt")
            .push(&request.prompt);
        url.query_pairs_mut()
            .append_pair("width", &request.width.to_string())
            .append_pair("height", &request.height.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("nologo", "true");
        Ok(url)
    }
}

impl Default for Pollinations {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for Pollinations {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Pollinations
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let seed = rand::thread_rng().gen_range(0..SEED_SPACE);
        let url = self.request_url(request, seed)?;

        let response = self
            .http
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PixfallError::Api { status, body: text });
        }

        // The asset lives behind a redirect; after following it the final
        // URL is the artifact. Without a redirect this is the request URL,
        // which renders the image on demand.
        Ok(response.url().to_string())
    }
}
