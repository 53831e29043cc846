//! Configuration types and loading for autogit.
//!
//! Two kinds of configuration live here:
//!
//! - [`SessionConfig`], the persisted pair of repository path and remote URL
//!   written after interactive setup and reloaded on later runs. It is a
//!   plain two-field JSON object, read and written wholesale.
//! - [`Settings`], the tool-level knobs (branch, remote alias, ssh host,
//!   ...) layered from defaults, an optional `autogit.toml`, and `AUTOGIT_*`
//!   environment variables.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the persisted session record.
pub const SESSION_FILE_NAME: &str = "autogit_config.json";

/// File name of the optional settings file.
pub const SETTINGS_FILE_NAME: &str = "autogit.toml";

/// Prefix of the environment variables that override settings.
pub const ENV_PREFIX: &str = "AUTOGIT_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The session record contained invalid JSON.
    #[error("failed to parse session record: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The layered settings could not be extracted.
    #[error("invalid settings: {0}")]
    SettingsError(#[from] Box<figment::Error>),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Session record
// ---------------------------------------------------------------------------

/// The repository location and remote endpoint for one sync session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Working tree the workflow operates on.
    pub repo_dir: PathBuf,
    /// Remote the tree is synchronized with.
    pub remote_url: String,
}

/// On-disk shape of the record. Both fields are optional here so that a
/// partial record can be recognised and treated as absent.
#[derive(Deserialize)]
struct RawSession {
    repo_dir: Option<String>,
    remote_url: Option<String>,
}

/// Load/save adapter for the session record.
pub trait SessionStore {
    /// Return the stored session, or `None` when no complete record exists.
    fn load(&self) -> Result<Option<SessionConfig>>;

    /// Replace the stored record wholesale.
    fn save(&self, session: &SessionConfig) -> Result<()>;
}

/// [`SessionStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`SESSION_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE_NAME))
    }

    /// Location of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the record. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be
    /// removed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self) -> Result<Option<SessionConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let raw: RawSession = serde_json::from_str(&content)?;

        match (raw.repo_dir, raw.remote_url) {
            (Some(repo_dir), Some(remote_url)) if !repo_dir.is_empty() && !remote_url.is_empty() => {
                Ok(Some(SessionConfig {
                    repo_dir: PathBuf::from(repo_dir),
                    remote_url,
                }))
            }
            _ => {
                debug!(path = %self.path.display(), "incomplete session record ignored");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &SessionConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(session)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Remote validation
// ---------------------------------------------------------------------------

/// Check that `url` uses the required credential scheme marker.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming `remote_url` otherwise.
pub fn validate_remote_url(url: &str, prefix: &str) -> Result<()> {
    let url = url.trim();
    if url.starts_with(prefix) && url.len() > prefix.len() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: "remote_url".to_string(),
            reason: format!("must be an SSH address starting with '{prefix}'"),
        })
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tool-level settings.
///
/// All fields use `serde` defaults so that a partially-specified TOML file
/// or a single environment variable yields sensible values for the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The single branch that is pulled and pushed.
    pub branch: String,

    /// Alias of the remote endpoint.
    pub remote_name: String,

    /// Scheme marker every remote URL must start with.
    pub remote_prefix: String,

    /// Host for the credential handshake; derived from the remote URL when unset.
    pub ssh_host: Option<String>,

    /// File created in a freshly initialized repository.
    pub placeholder_file: String,

    /// Look for other running `git` processes before touching the tree.
    pub check_processes: bool,

    /// Override commit author (e.g., `"sync-bot <bot@example.com>"`).
    pub author: Option<String>,

    /// Disable GPG signing for commits made by the workflow.
    pub no_gpg_sign: bool,

    /// Site generator binary for `preview`.
    pub site_generator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            branch: "master".to_string(),
            remote_name: "origin".to_string(),
            remote_prefix: "git@".to_string(),
            ssh_host: None,
            placeholder_file: "README.md".to_string(),
            check_processes: false,
            author: None,
            no_gpg_sign: false,
            site_generator: "hugo".to_string(),
        }
    }
}

impl Settings {
    /// Split the `author` override into name and email.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `author` is set but not of the
    /// form `Name <email>`.
    pub fn author_identity(&self) -> Result<Option<(String, String)>> {
        let Some(author) = self.author.as_deref() else {
            return Ok(None);
        };
        let invalid = || ConfigError::InvalidValue {
            key: "author".to_string(),
            reason: format!("expected 'Name <email>', got '{author}'"),
        };

        let (name, rest) = author.split_once('<').ok_or_else(invalid)?;
        let email = rest.strip_suffix('>').ok_or_else(invalid)?;
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(invalid());
        }
        Ok(Some((name.to_string(), email.to_string())))
    }
}

/// Build the settings figment for `config_dir`: defaults, then
/// `autogit.toml`, then `AUTOGIT_*` environment variables.
pub fn settings_figment(config_dir: &Path) -> Figment {
    Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(config_dir.join(SETTINGS_FILE_NAME)))
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Load settings for `config_dir`.
///
/// A missing `autogit.toml` is not an error.
///
/// # Errors
///
/// Returns [`ConfigError::SettingsError`] on malformed TOML or mistyped
/// values.
pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    let settings: Settings = settings_figment(config_dir)
        .extract()
        .map_err(Box::new)?;
    settings.author_identity()?;
    Ok(settings)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_missing_record_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_roundtrip_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(&dir.path().join("nested"));
        let session = SessionConfig {
            repo_dir: PathBuf::from("/home/me/blog"),
            remote_url: "git@github.com:me/blog.git".to_string(),
        };

        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn test_record_has_exactly_two_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(dir.path());
        store
            .save(&SessionConfig {
                repo_dir: PathBuf::from("/srv/site"),
                remote_url: "git@host:site".to_string(),
            })
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"repo_dir": "/srv/site", "remote_url": "git@host:site"})
        );
    }

    #[test]
    fn test_partial_record_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(dir.path());
        std::fs::write(store.path(), r#"{"repo_dir": "/srv/site"}"#).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_malformed_record_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_clear_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(dir.path());
        assert!(!store.clear().unwrap());
        std::fs::write(store.path(), "{}").unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_validate_remote_url() {
        assert!(validate_remote_url("git@github.com:me/blog.git", "git@").is_ok());
        assert!(validate_remote_url("https://github.com/me/blog.git", "git@").is_err());
        assert!(validate_remote_url("", "git@").is_err());
        assert!(validate_remote_url("git@", "git@").is_err());
    }

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert_eq!(s.branch, "master");
        assert_eq!(s.remote_name, "origin");
        assert_eq!(s.placeholder_file, "README.md");
        assert!(!s.check_processes);
        assert_eq!(s.author_identity().unwrap(), None);
    }

    #[test]
    fn test_author_identity_parsing() {
        let mut s = Settings::default();
        s.author = Some("Sync Bot <bot@example.com>".to_string());
        assert_eq!(
            s.author_identity().unwrap(),
            Some(("Sync Bot".to_string(), "bot@example.com".to_string()))
        );

        s.author = Some("no email here".to_string());
        assert!(matches!(
            s.author_identity(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_settings_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE_NAME,
                "branch = \"main\"\ncheck_processes = true\n",
            )?;
            jail.set_env("AUTOGIT_REMOTE_NAME", "upstream");

            let settings = load_settings(jail.directory()).expect("settings load");
            assert_eq!(settings.branch, "main");
            assert!(settings.check_processes);
            assert_eq!(settings.remote_name, "upstream");
            assert_eq!(settings.site_generator, "hugo");
            Ok(())
        });
    }

    #[test]
    fn test_settings_without_file() {
        Jail::expect_with(|jail| {
            let settings = load_settings(jail.directory()).expect("settings load");
            assert_eq!(settings, Settings::default());
            Ok(())
        });
    }
}
