//! Fetch AWS EC2 instance metadata as a nested JSON tree.
//!
//! This crate speaks IMDSv2: one token handshake (HTTP PUT with a TTL
//! header), then authenticated GETs over the metadata namespace. The
//! namespace is a flat text protocol where listings are newline-delimited
//! and directory entries carry a trailing slash; [`ImdsSession::resolve`]
//! walks it recursively:
//!
//! - directory entries become nested JSON objects
//! - leaf values that parse as JSON are stored decoded
//! - remaining leaves are kept as trimmed strings
//! - `public-keys/` listing lines (`0=my-key`) resolve through the fixed
//!   `public-keys/<id>/openssh-key` path
//!
//! # Example
//!
//! ```ignore
//! use imds_tree::{ImdsError, ImdsSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ImdsError> {
//!     let session = ImdsSession::connect().await?;
//!
//!     // One leaf.
//!     let ami = session.fetch("ami-id").await?;
//!     println!("running {}", ami);
//!
//!     // The whole namespace as JSON.
//!     let tree = session.resolve_all().await?;
//!     println!("{}", serde_json::to_string_pretty(&tree)?);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod session;
mod token;
mod tree;

pub use error::ImdsError;
pub use session::ImdsSession;
pub use token::ImdsToken;
pub use tree::MetadataTree;
