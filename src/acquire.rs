use tracing::{debug, warn};

use crate::config::AcquireConfig;
use crate::provider::ImageProvider;
use crate::providers::{Bfl, Pollinations, Together, Unsplash};
use crate::retry::PollPolicy;
use crate::types::{
    AcquiredImage, GenerationOutcome, GenerationRequest, ImageModel, Orientation,
};
use crate::{PixfallError, Result};

/// The fallback orchestrator. Adapters are tried strictly sequentially in
/// a fixed priority order: hosted inference first when a key is present,
/// then the submit-and-poll API when its key is present, then the key-free
/// generator unconditionally. The first adapter to produce a URL wins;
/// nothing is merged across adapters, and no adapter is retried within a
/// request. Holds no per-request state, so one acquirer can serve
/// concurrent requests.
pub struct ImageAcquirer {
    config: AcquireConfig,
    http: reqwest::Client,
    poll: PollPolicy,
}

impl ImageAcquirer {
    pub fn new(config: AcquireConfig) -> Self {
        Self {
            config,
            http: crate::providers::default_http_client(),
            poll: PollPolicy::default(),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Eligibility is re-derived from the config on every call; a key that
    /// is absent silently removes its adapter from the chain instead of
    /// erroring.
    fn generation_chain(&self) -> Vec<Box<dyn ImageProvider>> {
        let mut chain = Vec::<Box<dyn ImageProvider>>::new();

        if let Some(key) = self.config.together_api_key.as_deref() {
            let mut adapter = Together::new(key).with_http_client(self.http.clone());
            if let Some(base_url) = self.config.together_base_url.as_deref() {
                adapter = adapter.with_base_url(base_url);
            }
            chain.push(Box::new(adapter));
        }

        if let Some(key) = self.config.bfl_api_key.as_deref() {
            let mut adapter = Bfl::new(key)
                .with_http_client(self.http.clone())
                .with_poll_policy(self.poll);
            if let Some(base_url) = self.config.bfl_base_url.as_deref() {
                adapter = adapter.with_base_url(base_url);
            }
            chain.push(Box::new(adapter));
        }

        chain.push(Box::new(self.pollinations()));
        chain
    }

    fn pollinations(&self) -> Pollinations {
        let mut adapter = Pollinations::new().with_http_client(self.http.clone());
        if let Some(base_url) = self.config.pollinations_base_url.as_deref() {
            adapter = adapter.with_base_url(base_url);
        }
        adapter
    }

    /// Walks the fallback chain and returns the first acquired image, or
    /// the last failure once every eligible adapter has been exhausted.
    pub async fn acquire(&self, request: &GenerationRequest) -> Result<AcquiredImage> {
        let mut last_error: Option<PixfallError> = None;

        for adapter in self.generation_chain() {
            let kind = adapter.kind();
            debug!(provider = kind.as_str(), prompt = %request.prompt, "trying image provider");

            match adapter.generate(request).await {
                Ok(url) if !url.trim().is_empty() => {
                    debug!(provider = kind.as_str(), "image provider succeeded");
                    return Ok(AcquiredImage {
                        url,
                        prompt: request.prompt.clone(),
                        provider: kind,
                    });
                }
                Ok(_) => {
                    warn!(provider = kind.as_str(), "image provider returned an empty url");
                    last_error = Some(PixfallError::InvalidResponse(format!(
                        "{kind} returned an empty image url"
                    )));
                }
                Err(err) => {
                    warn!(provider = kind.as_str(), error = %err, "image provider failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            PixfallError::Generation("no image provider produced a result".to_string())
        }))
    }

    /// Inbound operation: never returns an error, only a normalized
    /// outcome with either a URL or a human-readable message.
    pub async fn generate_image(
        &self,
        prompt: &str,
        model: Option<ImageModel>,
    ) -> GenerationOutcome {
        let request = match GenerationRequest::new(prompt) {
            Ok(request) => request.with_model(model.unwrap_or_default()),
            Err(err) => return GenerationOutcome::failed(&err),
        };
        GenerationOutcome::from_result(self.acquire(&request).await)
    }

    /// Stock-photo lookup. With an Unsplash key the search result (or its
    /// failure) is final; without one the key-free generator renders a
    /// photographic stand-in for the query.
    pub async fn stock_image(&self, query: &str, orientation: Orientation) -> GenerationOutcome {
        if query.trim().is_empty() {
            return GenerationOutcome::failed(&PixfallError::InvalidResponse(
                "stock image query must not be empty".to_string(),
            ));
        }

        if let Some(key) = self.config.unsplash_access_key.as_deref() {
            let mut adapter = Unsplash::new(key).with_http_client(self.http.clone());
            if let Some(base_url) = self.config.unsplash_base_url.as_deref() {
                adapter = adapter.with_base_url(base_url);
            }
            debug!(query, orientation = orientation.as_str(), "searching stock photos");
            let result = adapter.search(query, orientation).await.map(|url| {
                AcquiredImage {
                    url,
                    prompt: query.to_string(),
                    provider: adapter.kind(),
                }
            });
            return GenerationOutcome::from_result(result);
        }

        debug!(query, "no unsplash key, generating a stock-style image");
        let prompt = format!(
            "professional high quality stock photograph of {query}, photorealistic, editorial photography"
        );
        let (width, height) = orientation.dimensions();
        let request = match GenerationRequest::new(prompt).and_then(|r| r.with_size(width, height))
        {
            Ok(request) => request,
            Err(err) => return GenerationOutcome::failed(&err),
        };

        let result = self.pollinations().generate(&request).await.map(|url| {
            AcquiredImage {
                url,
                prompt: query.to_string(),
                provider: crate::types::ProviderKind::Pollinations,
            }
        });
        GenerationOutcome::from_result(result)
    }
}
