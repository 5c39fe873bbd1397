//! HTTP client wrapper for metadata requests.

use std::time::Duration;

use reqwest::Client;

/// Default timeout for metadata requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default metadata service base URL (link-local address).
pub const DEFAULT_BASE_URL: &str = "http://169.254.169.254";

/// HTTP client wrapper for metadata service requests.
///
/// Carries the base URL so tests can point the whole stack at a mock
/// server, and applies one request timeout to every call made through it.
#[derive(Debug, Clone)]
pub struct ImdsClient {
    inner: Client,
    base_url: String,
}

impl ImdsClient {
    /// Create a new metadata client with the specified timeout and base URL.
    pub fn new(timeout: Duration, base_url: &str) -> Result<Self, reqwest::Error> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
