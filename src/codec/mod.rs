//! Node Identity & Path Codec
//!
//! Maps `(bucket, key)` pairs onto a single resource identifier of the form
//! `<scheme>://<authority>/<bucket>/<key>` and back. Every `/`-separated segment
//! is percent-encoded on its own, so `/` always stays a separator while every
//! other reserved byte is escaped. Decoding keeps empty segments inside the key,
//! which lets folder keys keep their trailing separator.

pub mod endpoint;
pub mod link;

pub use endpoint::Endpoint;
pub use link::public_link;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between key segments.
pub const SEPARATOR: char = '/';

/// Scheme used in resource identifiers unless configured otherwise.
pub const DEFAULT_SCHEME: &str = "s3";

/// Opaque resource identifier for a bucket, folder or object.
///
/// The wrapped string is kept verbatim; accessors slice it without reparsing
/// through a generic URL parser (which would normalize `.`/`..` segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Scheme before `://`, or `None` for malformed identifiers.
    pub fn scheme(&self) -> Option<&str> {
        split_components(&self.0).map(|(scheme, _, _)| scheme)
    }

    /// Authority between `://` and the first path separator.
    pub fn authority(&self) -> Option<&str> {
        split_components(&self.0).map(|(_, authority, _)| authority)
    }

    /// Path portion including its leading `/` (empty when absent).
    pub fn path(&self) -> Option<&str> {
        split_components(&self.0).map(|(_, _, path)| path)
    }

    /// Decoded `(bucket, key)`; `("", "")` for the root or malformed input.
    pub fn bucket_and_key(&self) -> (String, String) {
        extract_bucket_and_object(&self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId(value.to_string())
    }
}

impl FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ResourceId::from(s))
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn split_components(id: &str) -> Option<(&str, &str, &str)> {
    let (scheme, rest) = id.split_once("://")?;
    match rest.find(SEPARATOR) {
        Some(idx) => Some((scheme, &rest[..idx], &rest[idx..])),
        None => Some((scheme, rest, "")),
    }
}

/// Percent-encode a single path segment (RFC 3986 unreserved bytes stay raw).
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Percent-encode an object key segment by segment, keeping `/` as separator.
pub fn encode_key(key: &str) -> String {
    key.split(SEPARATOR)
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Encoded `<bucket>/<key>` path without a leading separator.
pub fn encode_path(bucket: &str, key: &str) -> String {
    format!("{}/{}", encode_segment(bucket), encode_key(key))
}

/// Extract `(bucket, key)` from a resource identifier.
///
/// Empty segments before the bucket are dropped. When the first remaining
/// segment contains `:` and another non-empty segment follows, the identifier
/// has the legacy shape with `host:port` embedded in the path, and extraction
/// starts one segment later. Returns `("", "")` when there is no bucket segment
/// or the identifier cannot be decoded.
pub fn extract_bucket_and_object(id: &str) -> (String, String) {
    let path = match split_components(id) {
        Some((_, _, path)) => path,
        None => return (String::new(), String::new()),
    };
    let segments: Vec<&str> = path.split(SEPARATOR).collect();

    let mut start = match first_non_empty(&segments, 0) {
        Some(idx) => idx,
        None => return (String::new(), String::new()),
    };
    if segments[start].contains(':') {
        if let Some(next) = first_non_empty(&segments, start + 1) {
            start = next;
        }
    }

    let decoded: Result<Vec<String>, _> = segments[start..]
        .iter()
        .map(|s| urlencoding::decode(s).map(|c| c.into_owned()))
        .collect();
    match decoded {
        Ok(mut parts) => {
            let bucket = parts.remove(0);
            (bucket, parts.join("/"))
        }
        Err(_) => (String::new(), String::new()),
    }
}

fn first_non_empty(segments: &[&str], from: usize) -> Option<usize> {
    segments
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, s)| !s.is_empty())
        .map(|(idx, _)| idx)
}

/// Encoder/decoder bound to one store connection.
///
/// Scheme and authority are fixed at construction and reused for every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCodec {
    scheme: String,
    authority: String,
}

impl ResourceCodec {
    pub fn new(scheme: impl Into<String>, authority: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
        }
    }

    /// Codec whose authority is the sanitized endpoint authority.
    pub fn for_endpoint(endpoint: &Endpoint, scheme: &str) -> Self {
        Self::new(scheme, endpoint.authority())
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn encode(&self, bucket: &str, key: &str) -> ResourceId {
        ResourceId(format!(
            "{}://{}/{}",
            self.scheme,
            self.authority,
            encode_path(bucket, key)
        ))
    }

    /// Bucket identifiers carry an empty key with a trailing separator.
    pub fn encode_bucket(&self, bucket: &str) -> ResourceId {
        self.encode(bucket, "")
    }

    /// Folder identifiers always end with the separator.
    pub fn encode_folder(&self, bucket: &str, prefix: &str) -> ResourceId {
        if prefix.is_empty() || prefix.ends_with(SEPARATOR) {
            self.encode(bucket, prefix)
        } else {
            self.encode(bucket, &format!("{}{}", prefix, SEPARATOR))
        }
    }

    pub fn decode(&self, id: &ResourceId) -> (String, String) {
        extract_bucket_and_object(id.as_str())
    }

    /// Identifier of the enclosing folder, or the bucket for top-level keys.
    ///
    /// `None` for buckets, the root and malformed identifiers.
    pub fn parent_of(&self, id: &ResourceId) -> Option<ResourceId> {
        let (bucket, key) = self.decode(id);
        if bucket.is_empty() || key.is_empty() {
            return None;
        }
        let trimmed = key.strip_suffix(SEPARATOR).unwrap_or(&key);
        match trimmed.rfind(SEPARATOR) {
            Some(idx) => Some(self.encode(&bucket, &trimmed[..=idx])),
            None => Some(self.encode_bucket(&bucket)),
        }
    }
}
