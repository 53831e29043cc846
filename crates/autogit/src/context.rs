//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what every command handler needs: the
//! resolved configuration directory, the working directory the command was
//! started from, and global flags.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use autogit_config::config::{load_settings, JsonSessionStore, Settings};
use autogit_config::config_dir::resolve_config_dir;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Directory holding the session record and the settings file.
    pub config_dir: PathBuf,

    /// Directory the command was started from.
    pub cwd: PathBuf,

    /// Verbose output.
    pub verbose: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// Config directory priority: `--config-dir` > `AUTOGIT_HOME` > current
    /// directory.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("cannot determine the current directory")?;
        Ok(Self::with_cwd(global, cwd))
    }

    fn with_cwd(global: &GlobalArgs, cwd: PathBuf) -> Self {
        let config_dir = resolve_config_dir(global.config_dir.as_deref(), &cwd);
        Self {
            config_dir,
            cwd,
            verbose: global.verbose,
        }
    }

    /// Effective settings: defaults, `autogit.toml`, `AUTOGIT_*` env.
    pub fn settings(&self) -> Result<Settings> {
        load_settings(&self.config_dir).with_context(|| {
            format!("failed to load settings from {}", self.config_dir.display())
        })
    }

    /// Store for the persisted session record.
    pub fn session_store(&self) -> JsonSessionStore {
        JsonSessionStore::in_dir(&self.config_dir)
    }

    /// Where the directory menu starts.
    pub fn start_dir(&self) -> &Path {
        &self.cwd
    }
}
