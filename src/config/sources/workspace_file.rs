//! Workspace-local `.bucketview.toml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::Path;

pub const WORKSPACE_FILE_NAME: &str = ".bucketview.toml";

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(workspace_root.join(WORKSPACE_FILE_NAME)).required(false))
}
