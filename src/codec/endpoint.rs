//! Store endpoint parsing and the sanitized authority used in identifiers.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Parsed store endpoint. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub secure: bool,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Parse `http(s)://host[:port]` or a bare `host[:port]` (assumed `http`).
    ///
    /// Userinfo embedded in the URL is dropped; paths, queries and fragments are
    /// ignored.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApiError::ConfigError("Store endpoint is empty".to_string()));
        }
        let normalized = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };
        let url = Url::parse(&normalized).map_err(|e| {
            ApiError::ConfigError(format!("Invalid store endpoint '{}': {}", trimmed, e))
        })?;

        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            other => {
                return Err(ApiError::ConfigError(format!(
                    "Unsupported endpoint scheme '{}' (must be http or https)",
                    other
                )))
            }
        };
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                ApiError::ConfigError(format!("Store endpoint '{}' has no host", trimmed))
            })?
            .to_string();
        let port = url
            .port_or_known_default()
            .unwrap_or(if secure { 443 } else { 80 });

        Ok(Self { secure, host, port })
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    pub fn default_port(&self) -> u16 {
        if self.secure {
            443
        } else {
            80
        }
    }

    /// `host` plus `:port` unless the port is the scheme default.
    pub fn authority(&self) -> String {
        if self.port == self.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// `http(s)://<authority>` without a trailing separator.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme(), self.authority())
    }
}
