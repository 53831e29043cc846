//! The sync workflow controller.
//!
//! [`SyncWorkflow::run`] takes a directory from "arbitrary directory" to
//! "pushed and conflict-free" through a fixed sequence of guards followed by
//! a rebase-based pull and a push:
//!
//! 1. credential handshake
//! 2. stale-lock cleanup (plus the optional concurrent-process guard)
//! 3. repository initialization when `.git` is absent
//! 4. interrupted-rebase menu (resume / abort / discard-and-restart)
//! 5. remote reattachment
//! 6. capture of uncommitted changes
//!
//! Pull and push failures are expected when the remote has diverged, so they
//! are routed into the resolution menus instead of ending the run.

use std::fs::OpenOptions;

use autogit_config::config::{SessionConfig, Settings};
use autogit_git::commands::{CommandOutput, Git, GitError};
use autogit_git::gitdir::{self, RepositoryState};
use autogit_git::process;
use autogit_git::ssh::{self, DEFAULT_SSH_HOST};
use autogit_ui::styles;
use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::console::{ask, confirm, Console};
use crate::error::{SyncError, SyncOutcome};

/// Message of the commit that seeds a freshly initialized repository.
const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Result alias for workflow steps.
pub type Result<T> = std::result::Result<T, SyncError>;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Performs the credential handshake against a remote host.
pub trait Authenticator {
    /// Returns `true` if the host accepted our credentials.
    fn verify(&self, host: &str) -> std::result::Result<bool, GitError>;
}

/// [`Authenticator`] using `ssh -T`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SshAuthenticator;

impl Authenticator for SshAuthenticator {
    fn verify(&self, host: &str) -> std::result::Result<bool, GitError> {
        ssh::verify_ssh(host)
    }
}

/// Commit message for automatically captured local changes.
pub fn capture_message(now: NaiveDateTime) -> String {
    format!("Local changes on {}", now.format("%Y%m%d_%H%M%S"))
}

/// Commit message for the sync commit: the date alone, or the date
/// prefixed to the user's text.
pub fn sync_message(now: NaiveDateTime, text: &str) -> String {
    let date = now.format("%Y%m%d");
    let text = text.trim();
    if text.is_empty() {
        date.to_string()
    } else {
        format!("{date}_{text}")
    }
}

/// The commands a user runs to finish a conflict by hand.
pub fn manual_instructions(remote: &str, branch: &str) -> String {
    format!(
        "Resolve all conflicts by hand, then finish the rebase and push:\n  \
         git add <conflicted_files>\n  \
         git rebase --continue\n  \
         git push {remote} {branch}"
    )
}

// ---------------------------------------------------------------------------
// Menu choices
// ---------------------------------------------------------------------------

/// Answers to the interrupted-rebase menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseChoice {
    Resume,
    Abort,
    DiscardAndRestart,
}

impl RebaseChoice {
    fn parse(answer: &str) -> Option<Self> {
        match answer.to_ascii_lowercase().as_str() {
            "r" => Some(Self::Resume),
            "a" => Some(Self::Abort),
            "d" => Some(Self::DiscardAndRestart),
            _ => None,
        }
    }
}

/// Answers to the conflict-resolution menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TakeRemote,
    TakeLocal,
    Manual,
}

impl Strategy {
    fn parse(answer: &str) -> Option<Self> {
        match answer {
            "1" => Some(Self::TakeRemote),
            "2" => Some(Self::TakeLocal),
            "3" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// What the interrupted-rebase menu led to.
enum RebaseResolution {
    /// `rebase --continue` completed.
    Resumed,
    /// The rebase was rolled back.
    Aborted,
    /// Rolled back; start the whole flow again.
    Restart,
    /// Automation stops here.
    Halted(SyncOutcome),
}

/// Control flow of one pass through the workflow.
enum Pass {
    Done(SyncOutcome),
    Restart,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// One synchronization run over a configured session.
pub struct SyncWorkflow<'a, C: Console + ?Sized> {
    session: &'a SessionConfig,
    settings: &'a Settings,
    console: &'a mut C,
    auth: &'a dyn Authenticator,
    git: Git,
    clock: fn() -> NaiveDateTime,
}

impl<'a, C: Console + ?Sized> SyncWorkflow<'a, C> {
    /// Prepare a run.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the `author` setting is malformed.
    pub fn new(
        session: &'a SessionConfig,
        settings: &'a Settings,
        console: &'a mut C,
        auth: &'a dyn Authenticator,
    ) -> Result<Self> {
        let mut git = Git::new(&session.repo_dir);
        if let Some((name, email)) = settings.author_identity()? {
            git = git.with_identity(&name, &email);
        }
        if settings.no_gpg_sign {
            git = git.with_config("commit.gpgsign", "false");
        }

        Ok(Self {
            session,
            settings,
            console,
            auth,
            git,
            clock: || Local::now().naive_local(),
        })
    }

    /// Replace the clock used for commit message timestamps.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Run the workflow to completion.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidSelection`] for an unrecognized menu
    /// answer, [`SyncError::InputClosed`] if input ends, and git/I/O errors
    /// from steps whose failure cannot be routed anywhere else.
    pub fn run(&mut self) -> Result<SyncOutcome> {
        if !self.authenticate()? {
            return Ok(SyncOutcome::AuthenticationFailed);
        }

        loop {
            match self.pass()? {
                Pass::Done(outcome) => {
                    info!(%outcome, "sync finished");
                    return Ok(outcome);
                }
                Pass::Restart => {
                    info!("restarting sync from scratch");
                    self.console.step("Starting over.");
                }
            }
        }
    }

    fn remote(&self) -> &str {
        &self.settings.remote_name
    }

    fn branch(&self) -> &str {
        &self.settings.branch
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    fn pass(&mut self) -> Result<Pass> {
        let state = RepositoryState::probe(&self.git)?;
        debug!(?state, "repository state");

        if state.has_stale_lock {
            self.clear_stale_lock();
        }
        if self.settings.check_processes && !self.confirm_no_concurrent_git()? {
            return Ok(Pass::Done(SyncOutcome::UserAborted));
        }

        self.ensure_repository(state.is_repo)?;

        if state.rebase_in_progress {
            match self.handle_interrupted_rebase()? {
                RebaseResolution::Resumed | RebaseResolution::Aborted => {}
                RebaseResolution::Restart => return Ok(Pass::Restart),
                RebaseResolution::Halted(outcome) => return Ok(Pass::Done(outcome)),
            }
        }

        self.reattach_remote();
        self.capture_local_changes()?;
        self.synchronize()
    }

    // -- guards -------------------------------------------------------------

    fn authenticate(&mut self) -> Result<bool> {
        let host = self
            .settings
            .ssh_host
            .clone()
            .or_else(|| ssh::ssh_host_from_url(&self.session.remote_url).map(String::from))
            .unwrap_or_else(|| DEFAULT_SSH_HOST.to_string());

        self.console.step(&format!("Verifying SSH access to {host}"));
        if self.auth.verify(&host)? {
            return Ok(true);
        }
        self.console.fail(
            "SSH key authentication failed. Make sure your public key is added to the remote host, then run again.",
        );
        Ok(false)
    }

    fn clear_stale_lock(&mut self) {
        match gitdir::remove_stale_lock(self.git.cwd()) {
            Ok(true) => self.console.warn("Removed stale index.lock file."),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "could not remove stale lock"),
        }
    }

    fn confirm_no_concurrent_git(&mut self) -> Result<bool> {
        let running = process::running_processes("git")?;
        if running.is_empty() {
            return Ok(true);
        }
        let pids: Vec<String> = running.iter().map(|p| p.pid.to_string()).collect();
        self.console.warn(&format!(
            "Detected another git process running (pid {}).",
            pids.join(", ")
        ));
        confirm(&mut *self.console, "Proceed anyway?")
    }

    fn ensure_repository(&mut self, is_repo: bool) -> Result<()> {
        let repo = self.git.cwd().to_path_buf();
        if is_repo {
            debug!(repo = %repo.display(), "existing repository");
            self.console.say("The directory is already a git repository.");
            return Ok(());
        }

        self.console
            .step("The directory is not a git repository yet, initializing...");
        std::fs::create_dir_all(&repo)?;
        self.git
            .run(&["init", &format!("--initial-branch={}", self.branch())])?;

        let placeholder = self.settings.placeholder_file.clone();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(repo.join(&placeholder))?;
        self.git.run(&["add", "--", &placeholder])?;
        self.commit(INITIAL_COMMIT_MESSAGE)?;
        self.reattach_remote();
        info!(repo = %repo.display(), "initialized repository");
        Ok(())
    }

    fn reattach_remote(&mut self) {
        let remote = self.remote().to_string();
        let url = self.session.remote_url.clone();
        self.console
            .step(&format!("Pointing remote '{remote}' at {url}"));

        if let Err(e) = self.git.output(&["remote", "remove", &remote]) {
            warn!(error = %e, "remote remove failed");
        }
        match self.git.output(&["remote", "add", &remote, &url]) {
            Ok(out) if !out.success() => warn!(stderr = %out.stderr, "remote add failed"),
            Err(e) => warn!(error = %e, "remote add failed"),
            Ok(_) => {}
        }
    }

    fn capture_local_changes(&mut self) -> Result<()> {
        if gitdir::changed_paths(&self.git)?.is_empty() {
            return Ok(());
        }
        self.git.run(&["add", "-A"])?;
        let message = capture_message(self.now());
        if self.commit(&message)? {
            self.console.step(&format!("Committed local changes: {message}"));
        }
        Ok(())
    }

    /// Commit whatever is staged. Returns `false` if there was nothing to
    /// commit.
    fn commit(&mut self, message: &str) -> Result<bool> {
        // Exit 0: index matches HEAD; 1: staged changes.
        let staged = self.git.output(&["diff", "--cached", "--quiet"])?;
        match staged.code {
            Some(0) => return Ok(false),
            Some(1) => {}
            _ => return Err(staged.to_error().into()),
        }

        let out = self.git.output(&["commit", "-m", message])?;
        if out.success() {
            Ok(true)
        } else {
            Err(out.to_error().into())
        }
    }

    // -- rebase handling ----------------------------------------------------

    fn handle_interrupted_rebase(&mut self) -> Result<RebaseResolution> {
        self.console.warn("An unfinished rebase was found.");
        self.console
            .say(&styles::render_menu_option("r", "Resume: continue the rebase"));
        self.console
            .say(&styles::render_menu_option("a", "Abort: roll back to the state before the rebase"));
        self.console.say(&styles::render_menu_option(
            "d",
            "Discard and restart: abort, clean up and run the sync again",
        ));

        let prompt = styles::render_prompt("How should the rebase be handled?", "r/a/d");
        let answer = ask(&mut *self.console, &prompt)?;
        let Some(choice) = RebaseChoice::parse(&answer) else {
            self.console.fail("Invalid choice, exiting.");
            return Err(SyncError::InvalidSelection {
                menu: "rebase",
                input: answer,
            });
        };
        info!(?choice, "rebase menu");

        match choice {
            RebaseChoice::Resume => {
                if self.continue_rebase()? {
                    Ok(RebaseResolution::Resumed)
                } else {
                    Ok(RebaseResolution::Halted(SyncOutcome::ConflictUnresolved))
                }
            }
            RebaseChoice::Abort => {
                if self.abort_rebase()? {
                    Ok(RebaseResolution::Aborted)
                } else {
                    Ok(RebaseResolution::Halted(SyncOutcome::ConflictUnresolved))
                }
            }
            RebaseChoice::DiscardAndRestart => {
                if !self.abort_rebase()? {
                    return Ok(RebaseResolution::Halted(SyncOutcome::ConflictUnresolved));
                }
                self.clear_stale_lock();
                Ok(RebaseResolution::Restart)
            }
        }
    }

    fn continue_rebase(&mut self) -> Result<bool> {
        let out = self
            .git
            .clone()
            .with_env("GIT_EDITOR", "true")
            .output(&["rebase", "--continue"])?;
        if out.success() && !gitdir::rebase_in_progress(self.git.cwd()) {
            self.console.pass("Rebase completed.");
            return Ok(true);
        }

        let unmerged = gitdir::unmerged_paths(&self.git).unwrap_or_default();
        if unmerged.is_empty() {
            self.report_failure("The rebase could not continue:", &out);
        } else {
            self.console.fail(&format!(
                "Unresolved merge conflicts remain in: {}",
                unmerged.join(", ")
            ));
        }
        let instructions = manual_instructions(self.remote(), self.branch());
        self.console.say(&instructions);
        Ok(false)
    }

    /// Roll back an in-progress rebase. Returns `false` if the marker is
    /// still there afterwards.
    fn abort_rebase(&mut self) -> Result<bool> {
        let out = self.git.output(&["rebase", "--abort"])?;
        if gitdir::rebase_in_progress(self.git.cwd()) {
            self.report_failure("The rebase could not be aborted:", &out);
            return Ok(false);
        }
        self.console.pass("Unfinished rebase aborted.");
        Ok(true)
    }

    // -- synchronization ----------------------------------------------------

    /// Whether the remote already has our branch. `ls-remote --exit-code`
    /// exits 2 when no ref matched; any other failure is left for the pull
    /// to report.
    fn remote_branch_exists(&self) -> Result<bool> {
        let out = self
            .git
            .output(&["ls-remote", "--exit-code", "--heads", self.remote(), self.branch()])?;
        Ok(out.code != Some(2))
    }

    fn synchronize(&mut self) -> Result<Pass> {
        let (remote, branch) = (self.remote().to_string(), self.branch().to_string());

        if self.remote_branch_exists()? {
            self.console
                .step(&format!("Pulling latest changes from {remote}/{branch}"));
            let pull = self.git.output(&["pull", "--rebase", &remote, &branch])?;
            if !pull.success() {
                self.report_failure("Pull failed:", &pull);
                return self.recover_from_pull_failure();
            }
        } else {
            self.console.info(&format!(
                "{remote} has no branch '{branch}' yet, skipping pull."
            ));
        }

        self.commit_and_push()
    }

    fn recover_from_pull_failure(&mut self) -> Result<Pass> {
        if !gitdir::rebase_in_progress(self.git.cwd()) {
            return self.resolve_conflict().map(Pass::Done);
        }
        match self.handle_interrupted_rebase()? {
            RebaseResolution::Resumed => self.commit_and_push(),
            RebaseResolution::Aborted => self.resolve_conflict().map(Pass::Done),
            RebaseResolution::Restart => Ok(Pass::Restart),
            RebaseResolution::Halted(outcome) => Ok(Pass::Done(outcome)),
        }
    }

    fn commit_and_push(&mut self) -> Result<Pass> {
        let prompt = styles::render_prompt(
            "Commit message (the date is added automatically, Enter for date only)",
            "",
        );
        let text = ask(&mut *self.console, &prompt)?;
        let message = sync_message(self.now(), &text);

        self.git.run(&["add", "-A"])?;
        if self.commit(&message)? {
            self.console.step(&format!("Committed changes: {message}"));
        } else {
            self.console.info("No changes to commit.");
        }

        let (remote, branch) = (self.remote().to_string(), self.branch().to_string());
        self.console.step(&format!("Pushing to {remote}/{branch}"));
        let push = self.git.output(&["push", &remote, &branch])?;
        if !push.success() {
            self.report_failure("Push failed:", &push);
            return self.resolve_conflict().map(Pass::Done);
        }

        self.console.pass("Sync complete.");
        Ok(Pass::Done(SyncOutcome::Success))
    }

    fn report_failure(&mut self, headline: &str, out: &CommandOutput) {
        self.console.fail(headline);
        let detail = out.diagnostic();
        if !detail.is_empty() {
            self.console.say(detail);
        }
    }

    // -- conflict resolution ------------------------------------------------

    fn resolve_conflict(&mut self) -> Result<SyncOutcome> {
        self.console.warn("The local and remote histories conflict.");
        self.console.say(&styles::render_menu_option(
            "1",
            "Take remote: reset the local branch to the remote tip",
        ));
        self.console.say(&styles::render_menu_option(
            "2",
            "Take local: force-push the local branch over the remote",
        ));
        self.console
            .say(&styles::render_menu_option("3", "Resolve the conflicts manually"));

        let prompt = styles::render_prompt("Choose a conflict resolution strategy", "1/2/3");
        let answer = ask(&mut *self.console, &prompt)?;
        let Some(strategy) = Strategy::parse(&answer) else {
            self.console.fail("Invalid choice, exiting.");
            return Err(SyncError::InvalidSelection {
                menu: "conflict",
                input: answer,
            });
        };
        info!(?strategy, "conflict menu");

        match strategy {
            Strategy::TakeRemote => {
                let question = "Overwrite the local branch with the remote? All unpushed local changes will be lost";
                if !confirm(&mut *self.console, question)? {
                    self.console.info("Cancelled.");
                    return Ok(SyncOutcome::UserAborted);
                }
                self.take_remote()?;
                Ok(SyncOutcome::Success)
            }
            Strategy::TakeLocal => {
                let question = "Overwrite the remote branch with the local one? All remote changes not present locally will be lost";
                if !confirm(&mut *self.console, question)? {
                    self.console.info("Cancelled.");
                    return Ok(SyncOutcome::UserAborted);
                }
                self.take_local()?;
                Ok(SyncOutcome::Success)
            }
            Strategy::Manual => {
                let instructions = manual_instructions(self.remote(), self.branch());
                self.console.say(&instructions);
                Ok(SyncOutcome::ConflictUnresolved)
            }
        }
    }

    fn leave_rebase(&mut self) -> Result<()> {
        if gitdir::rebase_in_progress(self.git.cwd()) {
            self.git.output(&["rebase", "--abort"])?;
        }
        Ok(())
    }

    fn take_remote(&mut self) -> Result<()> {
        let (remote, branch) = (self.remote().to_string(), self.branch().to_string());
        self.leave_rebase()?;
        self.git.run(&["fetch", &remote])?;
        self.git
            .run(&["reset", "--hard", &format!("{remote}/{branch}")])?;
        self.console.pass("The remote branch now overwrites the local one.");
        Ok(())
    }

    fn take_local(&mut self) -> Result<()> {
        let (remote, branch) = (self.remote().to_string(), self.branch().to_string());
        self.leave_rebase()?;
        self.capture_local_changes()?;
        self.git.run(&["push", &remote, &branch, "--force"])?;
        self.console.pass("The local branch now overwrites the remote one.");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
