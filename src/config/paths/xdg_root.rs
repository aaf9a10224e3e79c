//! XDG Base Directory utilities.

use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Application directory name under the XDG roots.
pub const APP_DIR: &str = "bucketview";

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = home_dir().ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(home.join(".config"))
}

/// `$XDG_CONFIG_HOME/bucketview/`. Not created.
pub fn app_config_dir() -> Result<PathBuf, ApiError> {
    Ok(config_home()?.join(APP_DIR))
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Expand a leading `~` to the home directory. Other paths are returned as is.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Platform download directory, else the current directory.
pub fn default_download_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
        assert_eq!(expand_home(Path::new("rel/~x")), PathBuf::from("rel/~x"));
    }

    #[test]
    fn test_expand_home_replaces_tilde() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_home(Path::new("~/Downloads")), home.join("Downloads"));
            assert_eq!(expand_home(Path::new("~")), home);
        }
    }

    #[test]
    fn test_app_config_dir_ends_with_app_name() {
        if let Ok(dir) = app_config_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }
}
