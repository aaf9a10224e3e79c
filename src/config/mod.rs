//! Configuration
//!
//! Layered settings for the browser: built-in defaults, the global file under
//! `$XDG_CONFIG_HOME/bucketview/`, a workspace `.bucketview.toml` and finally
//! `BUCKETVIEW__SECTION__KEY` environment variables.

pub mod facade;
mod merge;
pub mod paths;
pub mod sections;
mod sources;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use sections::{StoreConfig, TransferConfig};

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Browsing preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// When set, the root of the tree shows this bucket's contents instead of
    /// the bucket list.
    #[serde(default)]
    pub default_bucket: Option<String>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketviewConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub browse: BrowseConfig,

    #[serde(default)]
    pub transfer: TransferConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BucketviewConfig {
    /// Bucket that uploads go to: the transfer override, else the browse default.
    pub fn upload_bucket(&self) -> Option<&str> {
        self.transfer
            .bucket
            .as_deref()
            .or(self.browse.default_bucket.as_deref())
            .filter(|b| !b.is_empty())
    }
}
