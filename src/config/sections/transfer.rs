//! Upload and download settings.

use crate::config::xdg;
use crate::transfer::DEFAULT_BATCH_CONCURRENCY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_concurrency() -> usize {
    DEFAULT_BATCH_CONCURRENCY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Upload bucket; falls back to `browse.default_bucket`.
    #[serde(default)]
    pub bucket: Option<String>,

    /// Key prefix prepended to uploaded file names.
    #[serde(default)]
    pub sub_directory: String,

    /// Download target; `~` is expanded. None means the platform download dir.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Items in flight during batch operations.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl TransferConfig {
    pub fn resolve_download_dir(&self) -> PathBuf {
        match &self.download_directory {
            Some(dir) if !dir.as_os_str().is_empty() => xdg::expand_home(dir),
            _ => xdg::default_download_dir(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            sub_directory: String::new(),
            download_directory: None,
            concurrency: default_concurrency(),
        }
    }
}
