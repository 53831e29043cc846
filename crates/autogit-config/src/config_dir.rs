//! Discovery of the autogit configuration directory.
//!
//! The directory holds the session record and the optional settings file.
//! It is chosen by an explicit flag, then the `AUTOGIT_HOME` environment
//! variable, then the current working directory.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};

/// The name of the environment variable that can override the config directory.
pub const CONFIG_DIR_ENV: &str = "AUTOGIT_HOME";

/// Resolve the configuration directory.
///
/// `explicit` (typically a `--config-dir` flag) wins; otherwise
/// `AUTOGIT_HOME` when set and non-empty; otherwise `cwd`.
///
/// # Examples
///
/// ```
/// use autogit_config::config_dir::resolve_config_dir;
/// use std::path::Path;
///
/// let dir = resolve_config_dir(Some(Path::new("/etc/autogit")), Path::new("/tmp"));
/// assert_eq!(dir, Path::new("/etc/autogit"));
/// ```
pub fn resolve_config_dir(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    from_env_value(std::env::var(CONFIG_DIR_ENV).ok(), cwd)
}

fn from_env_value(value: Option<String>, cwd: &Path) -> PathBuf {
    match value {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v),
        _ => cwd.to_path_buf(),
    }
}

/// Ensure the configuration directory exists, creating parents as needed.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if directory creation fails.
pub fn ensure_config_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
