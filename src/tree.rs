//! Recursive resolution of the metadata namespace into a JSON tree.
//!
//! The namespace is a flat text protocol: a GET on a directory path
//! returns its children newline-delimited, with directory entries carrying
//! a trailing slash. [`resolve`] walks that listing into a nested
//! [`MetadataTree`], fetching one category per tree node.

use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};

use crate::client::ImdsClient;
use crate::error::ImdsError;
use crate::token::ImdsToken;

/// Metadata namespace root path. The trailing slash is part of the
/// endpoint; category paths are appended verbatim.
const META_DATA_PATH: &str = "/latest/meta-data/";

/// Token header attached to every metadata read.
const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";

/// Listing prefix that triggers the public-key special case.
const PUBLIC_KEYS_PREFIX: &str = "public-keys/";

/// Leaf under `public-keys/<id>/` holding the key material.
const OPENSSH_KEY_LEAF: &str = "openssh-key";

/// Defensive bound on directory nesting. The live namespace is three to
/// four levels deep; anything past this limit is treated as a broken or
/// hostile service rather than walked forever.
const MAX_DEPTH: usize = 16;

/// A resolved slice of the metadata namespace.
///
/// Keys are category names. Values are scalar strings, JSON values decoded
/// from leaves, or nested trees for directory entries.
pub type MetadataTree = Map<String, Value>;

/// One authenticated GET against the metadata namespace.
///
/// `category` may be empty (the namespace root), a leaf path, or a
/// slash-terminated directory path. Returns the response body with
/// surrounding whitespace trimmed; a non-2xx status is an error.
pub async fn fetch_category(
    client: &ImdsClient,
    token: &ImdsToken,
    category: &str,
) -> Result<String, ImdsError> {
    let url = format!("{}{}{}", client.base_url(), META_DATA_PATH, category);

    let response = client
        .inner()
        .get(&url)
        .header(TOKEN_HEADER, token.as_str())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImdsError::Http {
            category: category.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?.trim().to_string())
}

/// Recursively resolve `category` into a nested tree.
///
/// An empty `category` walks the whole namespace from the root. Directory
/// entries become nested trees keyed by their slash-stripped names, leaf
/// values that parse as JSON are stored decoded, and `public-keys/`
/// listings (`id=name` lines) resolve through the fixed
/// `public-keys/<id>/openssh-key` path. A category that comes back as a
/// single non-directory line resolves to the single-entry tree
/// `{category: value}`.
pub async fn resolve(
    client: &ImdsClient,
    token: &ImdsToken,
    category: &str,
) -> Result<MetadataTree, ImdsError> {
    resolve_node(client, token, category.to_string(), 0).await
}

/// Boxed indirection so `resolve_node_inner` can await itself.
fn resolve_node<'a>(
    client: &'a ImdsClient,
    token: &'a ImdsToken,
    category: String,
    depth: usize,
) -> Pin<Box<dyn Future<Output = Result<MetadataTree, ImdsError>> + Send + 'a>> {
    Box::pin(resolve_node_inner(client, token, category, depth))
}

async fn resolve_node_inner(
    client: &ImdsClient,
    token: &ImdsToken,
    category: String,
    depth: usize,
) -> Result<MetadataTree, ImdsError> {
    if depth >= MAX_DEPTH {
        return Err(ImdsError::TooDeep(MAX_DEPTH));
    }

    let body = fetch_category(client, token, &category).await?;

    if !is_container(&body, &category) {
        // Single scalar response: the requested path itself keys the value.
        let mut tree = MetadataTree::new();
        tree.insert(category, Value::String(body));
        return Ok(tree);
    }

    let mut tree = MetadataTree::new();
    for item in body.split('\n') {
        let child = child_path(&category, item);
        if item.ends_with('/') {
            let subtree = resolve_node(client, token, child, depth + 1).await?;
            tree.insert(item.trim_end_matches('/').to_string(), Value::Object(subtree));
        } else if child.starts_with(PUBLIC_KEYS_PREFIX) {
            // Listing lines look like `0=my-key`, but the key material
            // lives at a fixed sibling path, not under the listed name.
            let id = public_key_id(item);
            let material = fetch_category(client, token, &openssh_key_path(id)).await?;
            tree.insert(id.to_string(), Value::String(material));
        } else {
            let value = fetch_category(client, token, &child).await?;
            tree.insert(item.to_string(), decode_leaf(value));
        }
    }
    Ok(tree)
}

/// A response is container-like if it lists more than one item, if the
/// text itself ends with a slash (a lone directory entry), or if the
/// requested category path ends with a slash.
fn is_container(body: &str, category: &str) -> bool {
    body.contains('\n') || body.ends_with('/') || category.ends_with('/')
}

/// Join a listing item onto its parent category path.
fn child_path(category: &str, item: &str) -> String {
    if category.is_empty() || category.ends_with('/') {
        format!("{}{}", category, item)
    } else {
        format!("{}/{}", category, item)
    }
}

/// Extract the numeric id from an `id=name` public-key listing line.
/// Lines without an `=` are used as-is.
fn public_key_id(item: &str) -> &str {
    item.split_once('=').map_or(item, |(id, _)| id)
}

/// The fixed path holding the OpenSSH key material for a key id.
fn openssh_key_path(id: &str) -> String {
    format!("{}{}/{}", PUBLIC_KEYS_PREFIX, id, OPENSSH_KEY_LEAF)
}

/// Opportunistic JSON decoding: leaf values that parse as JSON are stored
/// decoded, anything else stays plain text. A parse failure is never an
/// error here.
fn decode_leaf(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(decoded) => decoded,
        Err(_) => Value::String(text),
    }
}
