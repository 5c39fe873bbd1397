//! Session facade: one token handshake, then authenticated metadata reads.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::client::{ImdsClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::ImdsError;
use crate::token::{self, ImdsToken, DEFAULT_TOKEN_TTL_SECS};
use crate::tree::{self, MetadataTree};

/// Main interface for fetching EC2 instance metadata.
///
/// Connecting performs the IMDSv2 token handshake once; every later read
/// reuses that token. The token is held in memory only and never
/// refreshed, so a session should not be kept around longer than the TTL
/// it was opened with.
///
/// # Example
///
/// ```ignore
/// use imds_tree::{ImdsError, ImdsSession};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ImdsError> {
///     let session = ImdsSession::connect().await?;
///     let ami = session.fetch("ami-id").await?;
///     println!("running {}", ami);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ImdsSession {
    client: ImdsClient,
    token: ImdsToken,
}

impl ImdsSession {
    /// Connect to the metadata service at the standard link-local address,
    /// with the default token TTL (300 s) and request timeout (10 s).
    pub async fn connect() -> Result<Self, ImdsError> {
        Self::connect_with(DEFAULT_BASE_URL, DEFAULT_TOKEN_TTL_SECS, DEFAULT_TIMEOUT).await
    }

    /// Connect to a metadata service at a custom base URL.
    ///
    /// This is primarily useful for testing with mock servers.
    pub async fn connect_with_base_url(base_url: &str) -> Result<Self, ImdsError> {
        Self::connect_with(base_url, DEFAULT_TOKEN_TTL_SECS, DEFAULT_TIMEOUT).await
    }

    /// Connect with an explicit token TTL and request timeout.
    pub async fn connect_with(
        base_url: &str,
        token_ttl_secs: u32,
        timeout: Duration,
    ) -> Result<Self, ImdsError> {
        let client = ImdsClient::new(timeout, base_url)?;
        let token = token::acquire(&client, token_ttl_secs).await?;
        Ok(Self { client, token })
    }

    /// The session token obtained at connect time.
    pub fn token(&self) -> &ImdsToken {
        &self.token
    }

    /// Fetch a single category as raw text, without recursion.
    ///
    /// Directory listings come back newline-delimited exactly as the
    /// service returns them; surrounding whitespace is trimmed.
    pub async fn fetch(&self, category: &str) -> Result<String, ImdsError> {
        tree::fetch_category(&self.client, &self.token, category).await
    }

    /// Fetch a single category and deserialize it as JSON.
    ///
    /// Unlike the opportunistic decoding [`resolve`](Self::resolve)
    /// applies to leaves, a value that does not parse here is an error.
    pub async fn fetch_json<T: DeserializeOwned>(&self, category: &str) -> Result<T, ImdsError> {
        let text = self.fetch(category).await?;
        serde_json::from_str(&text).map_err(ImdsError::from)
    }

    /// Recursively resolve `category` into a nested tree.
    ///
    /// Directory entries (listing lines ending in `/`) become nested
    /// objects, leaf values that parse as JSON are stored decoded, and
    /// `public-keys/` listings resolve through their `openssh-key`
    /// sibling path. An empty `category` walks the whole namespace.
    pub async fn resolve(&self, category: &str) -> Result<MetadataTree, ImdsError> {
        tree::resolve(&self.client, &self.token, category).await
    }

    /// Resolve the entire namespace from the root.
    pub async fn resolve_all(&self) -> Result<MetadataTree, ImdsError> {
        self.resolve("").await
    }
}
