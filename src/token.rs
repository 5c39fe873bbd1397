//! IMDSv2 token handshake.
//!
//! Every metadata read must carry a session token obtained by PUTting a
//! TTL header to the token endpoint. A token is acquired once per session
//! and reused for every read; it is never refreshed mid-run.

use crate::client::ImdsClient;
use crate::error::ImdsError;

/// Token endpoint path.
const TOKEN_PATH: &str = "/latest/api/token";

/// Token TTL header sent on the handshake.
const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";

/// Default token lifetime (five minutes).
pub const DEFAULT_TOKEN_TTL_SECS: u32 = 300;

/// An opaque session token for the instance metadata service.
///
/// Wraps the handshake response body byte for byte; the service treats
/// the value as opaque and so does this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImdsToken(String);

impl ImdsToken {
    /// The raw token value, as attached to request headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Perform the token handshake.
///
/// `ttl_secs` bounds how long the returned token stays valid; the service
/// caps it at six hours. A non-2xx response or transport failure is an
/// error, there is no retry.
pub async fn acquire(client: &ImdsClient, ttl_secs: u32) -> Result<ImdsToken, ImdsError> {
    let url = format!("{}{}", client.base_url(), TOKEN_PATH);

    let response = client
        .inner()
        .put(&url)
        .header(TOKEN_TTL_HEADER, ttl_secs.to_string())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImdsError::TokenHttp(status.as_u16()));
    }

    Ok(ImdsToken(response.text().await?))
}
