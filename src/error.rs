//! Error types
//!
//! `StoreError` covers failures of the object store primitives and keeps the
//! underlying message verbatim. `ApiError` is what every public operation of the
//! crate returns.

use thiserror::Error;

/// Failure of an object store primitive (list, get, put, remove).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Short machine-readable kind, used in structured log fields and batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "not_found",
            StoreError::PermissionDenied(_) => "permission_denied",
            StoreError::Network(_) => "network",
            StoreError::IoError(_) => "io",
            StoreError::Other(_) => "other",
        }
    }
}

/// Errors surfaced by resolver, transfer and tooling operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Invalid resource identifier: {0}")]
    InvalidResource(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::StoreError(e) => e.kind(),
            ApiError::InvalidResource(_) => "invalid_resource",
            ApiError::PreconditionFailed(_) => "precondition",
            ApiError::ConfigError(_) => "config",
            ApiError::IoError(_) => "io",
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
