//! Global config file under the XDG config home.

use crate::config::xdg;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::PathBuf;
use tracing::debug;

pub fn path() -> Result<PathBuf, ApiError> {
    Ok(xdg::app_config_dir()?.join("config.toml"))
}

/// Optional: a missing file or an undeterminable home is skipped.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match path() {
        Ok(path) => builder.add_source(File::from(path).required(false)),
        Err(e) => {
            debug!(error = %e, "No global config location");
            builder
        }
    }
}
