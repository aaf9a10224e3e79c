//! Environment variable source: BUCKETVIEW__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "BUCKETVIEW";

/// Add environment variable overlay to builder.
/// `BUCKETVIEW__STORE__ENDPOINT` maps to `store.endpoint`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}
