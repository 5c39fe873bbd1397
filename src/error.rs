//! Error types for instance metadata operations.

use thiserror::Error;

/// Errors that can occur while talking to the instance metadata service.
///
/// The library never terminates the process; callers (such as the
/// `imds-tree` binary) decide what a failure means for process exit.
#[derive(Debug, Error)]
pub enum ImdsError {
    /// The token handshake was rejected by the metadata service.
    #[error("token handshake failed: http {0}")]
    TokenHttp(u16),

    /// A metadata read was rejected by the metadata service.
    #[error("fetching {category:?} failed: http {status}")]
    Http {
        /// The category path that was requested.
        category: String,
        /// The HTTP status code returned.
        status: u16,
    },

    /// Transport-level failure: connection refused, DNS, timeout.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Directory nesting exceeded the recursion guard.
    #[error("metadata tree exceeds {0} nested levels")]
    TooDeep(usize),

    /// JSON serialization or explicit deserialization failed.
    ///
    /// Opportunistic decoding of leaf values during a tree walk never
    /// produces this; values that fail to parse stay plain text.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
