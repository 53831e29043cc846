//! Git directory facts and repository state.
//!
//! The lock artifact and the rebase markers are filesystem conventions of
//! the git client, so they are checked directly on disk rather than through
//! a `git` invocation. [`RepositoryState`] bundles these facts together with
//! the working-tree status into one snapshot.

use crate::commands::{Git, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The name of the git metadata directory inside a working tree.
pub const GIT_DIR_NAME: &str = ".git";

/// Lock file git holds while it owns the index.
const INDEX_LOCK: &str = "index.lock";

/// Markers left behind by the merge and apply rebase backends.
const REBASE_MARKERS: [&str; 2] = ["rebase-merge", "rebase-apply"];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Returns `true` if `repo` itself holds git metadata.
///
/// Unlike an upward search this only looks at `repo/.git`, so a directory
/// nested inside some other repository is still reported as uninitialized.
pub fn is_git_repo(repo: &Path) -> bool {
    repo.join(GIT_DIR_NAME).exists()
}

/// Path of the index lock artifact for the tree at `repo`.
pub fn lock_path(repo: &Path) -> PathBuf {
    repo.join(GIT_DIR_NAME).join(INDEX_LOCK)
}

/// Returns `true` if an interrupted rebase marker exists.
pub fn rebase_in_progress(repo: &Path) -> bool {
    let git_dir = repo.join(GIT_DIR_NAME);
    REBASE_MARKERS.iter().any(|m| git_dir.join(m).is_dir())
}

/// Remove a stale index lock if one is present.
///
/// Returns `true` when a lock was removed.
///
/// # Errors
///
/// Returns the I/O error if the lock exists but cannot be deleted.
pub fn remove_stale_lock(repo: &Path) -> io::Result<bool> {
    let lock = lock_path(repo);
    if !lock.exists() {
        return Ok(false);
    }
    std::fs::remove_file(&lock)?;
    debug!(path = %lock.display(), "removed stale lock");
    Ok(true)
}

/// Paths reported by `git status --porcelain`, one per changed entry.
///
/// # Errors
///
/// Propagates spawn and non-zero exit failures from `git`.
pub fn changed_paths(git: &Git) -> Result<Vec<String>> {
    let status = git.run(&["status", "--porcelain"])?;
    Ok(status
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| line[3..].to_string())
        .collect())
}

/// Paths still carrying unmerged conflict entries.
///
/// # Errors
///
/// Propagates spawn and non-zero exit failures from `git`.
pub fn unmerged_paths(git: &Git) -> Result<Vec<String>> {
    let out = git.run(&["diff", "--name-only", "--diff-filter=U"])?;
    Ok(out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

// ---------------------------------------------------------------------------
// Repository state
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of the working tree.
///
/// Never cached: every workflow run probes afresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepositoryState {
    /// `.git` exists at the location.
    pub is_repo: bool,
    /// An `index.lock` is present.
    pub has_stale_lock: bool,
    /// A rebase was started and never finished or aborted.
    pub rebase_in_progress: bool,
    /// Tracked or untracked modifications are pending.
    pub has_local_changes: bool,
}

impl RepositoryState {
    /// Probe the tree that `git` is bound to.
    ///
    /// The status query is skipped for locations that are not repositories.
    ///
    /// # Errors
    ///
    /// Propagates failures of the `git status` invocation.
    pub fn probe(git: &Git) -> Result<Self> {
        let repo = git.cwd();
        let is_repo = is_git_repo(repo);
        if !is_repo {
            return Ok(Self::default());
        }

        Ok(Self {
            is_repo,
            has_stale_lock: lock_path(repo).exists(),
            rebase_in_progress: rebase_in_progress(repo),
            has_local_changes: !changed_paths(git)?.is_empty(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
