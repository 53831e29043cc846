//! Git command execution wrappers.
//!
//! Provides a thin wrapper around `git` subprocess invocation so that the
//! rest of the codebase does not need to deal with `std::process::Command`
//! directly. Every invocation is an argument vector; nothing is ever handed
//! to a shell, so commit messages and URLs are passed through verbatim.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when running external commands.
#[derive(Debug, Error)]
pub enum GitError {
    /// The binary could not be found or spawned.
    #[error("failed to execute {program}: {source}")]
    SpawnError {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The command exited with a non-zero status.
    #[error("git command failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// The content of stderr.
        stderr: String,
    },
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

// ---------------------------------------------------------------------------
// Captured output
// ---------------------------------------------------------------------------

/// Exit status and captured streams of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// The exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Stdout with trailing whitespace removed. Leading whitespace is kept
    /// because porcelain formats are column-sensitive.
    pub stdout: String,
    /// Trimmed stderr.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` if the command exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Returns `true` if either stream contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }

    /// What the command had to say about its failure: stderr, or stdout when
    /// stderr is empty (some git messages go to stdout).
    pub fn diagnostic(&self) -> &str {
        if self.stderr.is_empty() {
            self.stdout.trim()
        } else {
            &self.stderr
        }
    }

    /// [`GitError::CommandFailed`] describing this output.
    pub fn to_error(&self) -> GitError {
        GitError::CommandFailed {
            code: self.code,
            stderr: self.diagnostic().to_string(),
        }
    }

    /// Convert a non-zero exit into [`GitError::CommandFailed`], returning
    /// stdout otherwise.
    pub fn into_result(self) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(self.to_error())
        }
    }
}

/// Run a prepared command to completion and capture both streams.
///
/// Only a failure to spawn is an error; a non-zero exit is reported through
/// [`CommandOutput::code`].
pub fn capture(command: &mut Command) -> Result<CommandOutput> {
    let program = command.get_program().to_string_lossy().to_string();
    let output = command.output().map_err(|source| GitError::SpawnError {
        program: program.clone(),
        source,
    })?;

    let captured = CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };
    debug!(program = %program, code = ?captured.code, "command finished");
    Ok(captured)
}

// ---------------------------------------------------------------------------
// Git runner
// ---------------------------------------------------------------------------

/// A `git` invoker bound to one working tree.
///
/// Carries the working directory plus any `-c key=value` overrides and
/// environment variables that must accompany every invocation (commit
/// identity, signing policy).
///
/// Every invocation runs under the `C` locale: callers inspect git's
/// messages, and translated output would not match.
#[derive(Debug, Clone)]
pub struct Git {
    cwd: PathBuf,
    config: Vec<String>,
    envs: Vec<(String, String)>,
}

impl Git {
    /// Create a runner for the working tree at `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            config: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// The working directory every command runs in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Add a `-c key=value` override to every invocation.
    pub fn with_config(mut self, key: &str, value: &str) -> Self {
        self.config.push(format!("{key}={value}"));
        self
    }

    /// Force author and committer identity for every commit this runner makes.
    pub fn with_identity(mut self, name: &str, email: &str) -> Self {
        for (key, value) in [
            ("GIT_AUTHOR_NAME", name),
            ("GIT_COMMITTER_NAME", name),
            ("GIT_AUTHOR_EMAIL", email),
            ("GIT_COMMITTER_EMAIL", email),
        ] {
            self.envs.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Set an environment variable on every invocation.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        for pair in &self.config {
            cmd.arg("-c").arg(pair);
        }
        cmd.args(args)
            .current_dir(&self.cwd)
            .env("LC_ALL", "C")
            .env_remove("LANGUAGE");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run `git <args>` and return its captured output whatever the exit code.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::SpawnError`] if `git` cannot be started.
    pub fn output(&self, args: &[&str]) -> Result<CommandOutput> {
        debug!(cwd = %self.cwd.display(), ?args, "git");
        capture(&mut self.command(args))
    }

    /// Run `git <args>` and return trimmed stdout on success.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::SpawnError`] if `git` cannot be found, or
    /// [`GitError::CommandFailed`] if the command exits with a non-zero status.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        self.output(args)?.into_result()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_version() {
        // `git --version` should succeed on any system with git installed.
        let result = Git::new(".").run(&["--version"]);
        assert!(result.is_ok(), "git --version failed: {result:?}");
        let output = result.unwrap();
        assert!(
            output.starts_with("git version"),
            "unexpected output: {output}"
        );
    }

    #[test]
    fn test_run_failure() {
        let result = Git::new(".").run(&["not-a-real-subcommand"]);
        match result.unwrap_err() {
            GitError::CommandFailed { code, stderr } => {
                assert!(code.is_some());
                assert!(!stderr.is_empty());
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_run_bad_cwd() {
        let result = Git::new("/nonexistent/directory/xyz").run(&["status"]);
        assert!(matches!(result, Err(GitError::SpawnError { .. })));
    }

    #[test]
    fn test_output_reports_nonzero_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = Git::new(dir.path()).output(&["status"]).unwrap();
        assert!(!out.success());
        assert!(out.mentions("not a git repository"));
    }

    #[test]
    fn test_messages_ignore_user_locale() {
        let dir = tempfile::tempdir().unwrap();
        let out = Git::new(dir.path())
            .with_env("LANGUAGE", "de")
            .with_env("LANG", "de_DE.UTF-8")
            .output(&["status"])
            .unwrap();
        assert!(out.mentions("not a git repository"), "{out:?}");
    }

    #[test]
    fn test_diagnostic_falls_back_to_stdout() {
        let out = CommandOutput {
            code: Some(1),
            stdout: "On branch master\nnothing to commit".to_string(),
            stderr: String::new(),
        };
        assert_eq!(out.diagnostic(), "On branch master\nnothing to commit");
        match out.to_error() {
            GitError::CommandFailed { code, stderr } => {
                assert_eq!(code, Some(1));
                assert!(stderr.contains("nothing to commit"));
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }

        let noisy = CommandOutput {
            stderr: "fatal: bad".to_string(),
            ..out
        };
        assert_eq!(noisy.diagnostic(), "fatal: bad");
    }

    #[test]
    fn test_config_override_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let git = Git::new(dir.path()).with_config("autogit.marker", "yes");
        let value = git.run(&["config", "--get", "autogit.marker"]).unwrap();
        assert_eq!(value, "yes");
    }

    #[test]
    fn test_identity_is_exported() {
        let dir = tempfile::tempdir().unwrap();
        let git = Git::new(dir.path()).with_identity("Sync Bot", "bot@example.com");
        let ident = git.run(&["var", "GIT_AUTHOR_IDENT"]).unwrap();
        assert!(ident.starts_with("Sync Bot <bot@example.com>"), "{ident}");
    }
}
