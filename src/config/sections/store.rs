//! Object store connection settings.

use crate::codec::{Endpoint, ResourceCodec, DEFAULT_SCHEME};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_endpoint() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `host[:port]` or a full `http(s)://` URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub access_key: String,

    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Scheme of generated resource identifiers.
    #[serde(default = "default_scheme")]
    pub identifier_scheme: String,
}

impl StoreConfig {
    pub fn endpoint(&self) -> Result<Endpoint, ApiError> {
        Endpoint::parse(&self.endpoint)
    }

    /// Codec whose authority is this endpoint.
    pub fn codec(&self) -> Result<ResourceCodec, ApiError> {
        let endpoint = self.endpoint()?;
        Ok(ResourceCodec::for_endpoint(&endpoint, &self.identifier_scheme))
    }

    pub fn has_credentials(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            access_key: String::new(),
            secret_key: String::new(),
            region: default_region(),
            identifier_scheme: default_scheme(),
        }
    }
}

// Keys never reach logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &str| if s.is_empty() { "" } else { "***" };
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &redact(&self.access_key))
            .field("secret_key", &redact(&self.secret_key))
            .field("region", &self.region)
            .field("identifier_scheme", &self.identifier_scheme)
            .finish()
    }
}
