//! Fixture shared by the workflow test binaries: a bare "remote"
//! repository and a working location in one temporary directory, a stubbed
//! credential handshake and a scripted console.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use autogit_config::config::{SessionConfig, Settings};
use autogit_core::console::{Console, ScriptedConsole};
use autogit_core::{Authenticator, SyncError, SyncOutcome, SyncWorkflow};
use autogit_git::commands::{Git, GitError};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub struct Accept;

impl Authenticator for Accept {
    fn verify(&self, _host: &str) -> Result<bool, GitError> {
        Ok(true)
    }
}

pub struct Reject;

impl Authenticator for Reject {
    fn verify(&self, _host: &str) -> Result<bool, GitError> {
        Ok(false)
    }
}

pub struct Fixture {
    pub tmp: TempDir,
    pub remote: PathBuf,
    pub session: SessionConfig,
    pub settings: Settings,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let remote = tmp.path().join("remote.git");
        git_in(tmp.path())
            .run(&["init", "--bare", "--initial-branch=master", "remote.git"])
            .unwrap();

        let session = SessionConfig {
            repo_dir: tmp.path().join("work"),
            remote_url: remote.display().to_string(),
        };
        let settings = Settings {
            author: Some("Sync Test <sync@example.com>".to_string()),
            no_gpg_sign: true,
            ..Settings::default()
        };
        Self {
            tmp,
            remote,
            session,
            settings,
        }
    }

    pub fn work(&self) -> &Path {
        &self.session.repo_dir
    }

    /// Run the workflow against any console.
    pub fn run_with<C: Console>(
        &self,
        auth: &dyn Authenticator,
        console: &mut C,
    ) -> Result<SyncOutcome, SyncError> {
        SyncWorkflow::new(&self.session, &self.settings, console, auth)
            .unwrap()
            .with_clock(fixed_clock)
            .run()
    }

    pub fn sync_with(
        &self,
        auth: &dyn Authenticator,
        answers: &[&str],
    ) -> (Result<SyncOutcome, SyncError>, ScriptedConsole) {
        let mut console = ScriptedConsole::new(answers.iter().copied());
        let result = self.run_with(auth, &mut console);
        (result, console)
    }

    pub fn sync(&self, answers: &[&str]) -> (Result<SyncOutcome, SyncError>, ScriptedConsole) {
        self.sync_with(&Accept, answers)
    }

    /// Initialize the working location and publish it to the remote.
    pub fn bootstrap(&self) {
        let (result, _) = self.sync(&[""]);
        assert_eq!(result.unwrap(), SyncOutcome::Success);
    }

    /// A second clone of the remote, standing in for another machine.
    pub fn other_clone(&self) -> PathBuf {
        let other = self.tmp.path().join("other");
        git_in(self.tmp.path())
            .run(&["clone", &self.remote.display().to_string(), "other"])
            .unwrap();
        other
    }

    /// Commit `content` to `file` in the other clone and push it.
    pub fn push_from_other(&self, file: &str, content: &str, message: &str) {
        let other = self.other_clone();
        std::fs::write(other.join(file), content).unwrap();
        let git = git_in(&other);
        git.run(&["add", "-A"]).unwrap();
        git.run(&["commit", "-m", message]).unwrap();
        git.run(&["push", "origin", "master"]).unwrap();
    }

    pub fn remote_tip(&self) -> String {
        git_in(&self.remote).run(&["rev-parse", "master"]).unwrap()
    }
}

pub fn git_in(dir: &Path) -> Git {
    Git::new(dir)
        .with_identity("Other Machine", "other@example.com")
        .with_config("commit.gpgsign", "false")
}

pub fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(12, 5, 7)
        .unwrap()
}

pub fn subjects(dir: &Path) -> Vec<String> {
    git_in(dir)
        .run(&["log", "--format=%s", "master"])
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

pub fn head(dir: &Path) -> String {
    git_in(dir).run(&["rev-parse", "HEAD"]).unwrap()
}

pub const CAPTURE: &str = "Local changes on 20240309_120507";

/// Set up a same-line conflict: the remote and the local tree both rewrite
/// the placeholder file.
pub fn conflicting_fixture() -> Fixture {
    let f = Fixture::new();
    f.bootstrap();
    f.push_from_other("README.md", "remote line\n", "remote change");
    std::fs::write(f.work().join("README.md"), "local line\n").unwrap();
    f
}

