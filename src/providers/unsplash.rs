use std::time::Duration;

use serde::Deserialize;

use super::{default_http_client, join_endpoint};
use crate::types::{Orientation, ProviderKind};
use crate::{PixfallError, Result};

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    #[serde(default)]
    regular: Option<String>,
}

/// Stock-photo search. Takes a free-text query rather than a generation
/// prompt, so it sits outside the generation fallback chain and is wired
/// into the stock-image path of the acquirer.
#[derive(Clone)]
pub struct Unsplash {
    http: reqwest::Client,
    access_key: String,
    base_url: String,
}

impl Unsplash {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            http: default_http_client(),
            access_key: access_key.into(),
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

    pub fn kind(&self) -> ProviderKind {
        ProviderKind::Unsplash
    }

    /// Returns the `regular`-sized URL of the best match for `query`.
    pub async fn search(&self, query: &str, orientation: Orientation) -> Result<String> {
        let response = self
            .http
            .get(join_endpoint(&self.base_url, "search/photos"))
            .query(&[
                ("query", query),
                ("page", "1"),
                ("per_page", "1"),
                ("orientation", orientation.as_str()),
            ])
            .header(
                "Authorization",
                format!("Client-ID {}", self.access_key),
            )
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PixfallError::Api { status, body: text });
        }

        let parsed = response.json::<SearchResponse>().await?;
        parsed
            .results
            .into_iter()
            .find_map(|photo| photo.urls.regular.filter(|url| !url.trim().is_empty()))
            .ok_or_else(|| {
                PixfallError::Generation(format!("no stock images found for query: {query}"))
            })
    }
}
