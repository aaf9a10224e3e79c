//! Defaults seeded into every builder before any source is added.
//!
//! The lowest layer is `BucketviewConfig::default()` serialized back into a
//! `Config`, so the serde `default` functions on each section stay the only
//! place a default value is written down.

use crate::config::BucketviewConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&BucketviewConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_defaults_match_struct_defaults() {
        let loaded: BucketviewConfig = builder_with_defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        let expected = BucketviewConfig::default();

        assert_eq!(loaded.store.endpoint, expected.store.endpoint);
        assert_eq!(loaded.store.region, expected.store.region);
        assert_eq!(loaded.store.identifier_scheme, expected.store.identifier_scheme);
        assert_eq!(loaded.transfer.concurrency, expected.transfer.concurrency);
        assert_eq!(loaded.transfer.bucket, None);
        assert_eq!(loaded.transfer.download_directory, None);
        assert_eq!(loaded.browse.default_bucket, None);
        assert_eq!(loaded.logging.output, expected.logging.output);
    }

    #[test]
    fn test_file_layer_overrides_seeded_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("over.toml");
        std::fs::write(&path, "[transfer]\ndownload_directory = \"/srv/dl\"\n").unwrap();

        let loaded: BucketviewConfig = builder_with_defaults()
            .unwrap()
            .add_source(config::File::from(path.as_path()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(
            loaded.transfer.download_directory,
            Some(std::path::PathBuf::from("/srv/dl"))
        );
        assert_eq!(loaded.transfer.concurrency, 4);
    }
}
