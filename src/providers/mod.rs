use std::time::Duration;

pub mod bfl;
pub mod pollinations;
pub mod together;
pub mod unsplash;

pub use bfl::Bfl;
pub use pollinations::Pollinations;
pub use together::Together;
pub use unsplash::Unsplash;

pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}

pub(crate) fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
