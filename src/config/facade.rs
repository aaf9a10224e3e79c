//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::BucketviewConfig;
use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Global config file: `$XDG_CONFIG_HOME/bucketview/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ApiError> {
        super::sources::global_file::path()
    }

    /// Load configuration from files and environment.
    pub fn load(workspace_root: &Path) -> Result<BucketviewConfig, ApiError> {
        Ok(MergeService::load(workspace_root)?)
    }

    /// Load configuration from a specific file with the environment overlay.
    pub fn load_from_file(path: &Path) -> Result<BucketviewConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Ok(MergeService::load_from_file(path)?)
    }

    /// Create default configuration.
    pub fn default() -> BucketviewConfig {
        BucketviewConfig::default()
    }
}
