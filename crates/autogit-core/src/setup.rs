//! Interactive session setup.
//!
//! Picks the repository directory from a short candidate list, asks for the
//! remote endpoint, and persists the pair through a [`SessionStore`] so that
//! later runs can skip the questions.

use std::path::{Path, PathBuf};

use autogit_config::config::{validate_remote_url, SessionConfig, SessionStore, Settings};
use autogit_ui::styles;
use tracing::info;

use crate::console::{ask_until, confirm, Console};
use crate::error::SyncError;

/// How many directories are offered: the start directory plus three ancestors.
const MAX_CANDIDATES: usize = 4;

/// `start` followed by up to three of its ancestors, without duplicates.
pub fn candidate_dirs(start: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::with_capacity(MAX_CANDIDATES);
    for dir in start.ancestors().take(MAX_CANDIDATES) {
        if !dirs.iter().any(|d| d == dir) {
            dirs.push(dir.to_path_buf());
        }
    }
    dirs
}

fn menu_key(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Let the user pick one of `candidates`.
///
/// Returns `None` when the user quits with `N`. Anything else that is not a
/// listed letter is rejected and asked again.
///
/// # Errors
///
/// [`SyncError::InputClosed`] if input ends before a valid answer.
pub fn choose_directory<C: Console + ?Sized>(
    console: &mut C,
    candidates: &[PathBuf],
) -> Result<Option<PathBuf>, SyncError> {
    for (i, dir) in candidates.iter().enumerate() {
        let label = format!("{} - {}", display_name(dir), dir.display());
        console.say(&styles::render_menu_option(&menu_key(i).to_string(), &label));
    }

    let last = menu_key(candidates.len().saturating_sub(1));
    let prompt = styles::render_prompt(
        "Choose the repository directory",
        &format!("A-{last}, or N to quit"),
    );
    ask_until(console, &prompt, |answer| {
        let upper = answer.to_ascii_uppercase();
        if upper == "N" {
            return Ok(None);
        }
        let mut chars = upper.chars();
        match (chars.next(), chars.next()) {
            (Some(c @ 'A'..='Z'), None) if ((c as u8 - b'A') as usize) < candidates.len() => {
                Ok(Some(candidates[(c as u8 - b'A') as usize].clone()))
            }
            _ => Err("Invalid choice, pick again.".to_string()),
        }
    })
}

/// Ask for the remote URL until it carries the required scheme marker.
///
/// # Errors
///
/// [`SyncError::InputClosed`] if input ends before a valid URL.
pub fn prompt_remote<C: Console + ?Sized>(console: &mut C, prefix: &str) -> Result<String, SyncError> {
    let prompt = styles::render_prompt("Remote repository address", &format!("{prefix}host:owner/repo.git"));
    ask_until(console, &prompt, |answer| {
        validate_remote_url(answer, prefix)
            .map(|()| answer.to_string())
            .map_err(|_| format!("The remote address must be in SSH form, starting with '{prefix}'."))
    })
}

/// Produce the session for this run.
///
/// Reuses the stored record when the user agrees; otherwise (no record,
/// `reconfigure`, or a `N` answer) asks for directory and remote and saves
/// the new pair. Returns `None` if the user quits at the directory menu.
///
/// # Errors
///
/// Propagates store failures and closed input.
pub fn resolve_session<C, S>(
    console: &mut C,
    store: &S,
    candidates: &[PathBuf],
    settings: &Settings,
    reconfigure: bool,
) -> Result<Option<SessionConfig>, SyncError>
where
    C: Console + ?Sized,
    S: SessionStore + ?Sized,
{
    if !reconfigure {
        if let Some(existing) = store.load()? {
            console.info(&format!(
                "Saved configuration: {} -> {}",
                existing.repo_dir.display(),
                existing.remote_url
            ));
            if confirm(console, "Use this configuration? Choose N on first use to set it up again")? {
                return Ok(Some(existing));
            }
        }
    }

    console.say("Setting up a new configuration.");
    let Some(repo_dir) = choose_directory(console, candidates)? else {
        console.say("Exited.");
        return Ok(None);
    };
    let remote_url = prompt_remote(console, &settings.remote_prefix)?;

    let session = SessionConfig {
        repo_dir,
        remote_url,
    };
    store.save(&session)?;
    info!(repo = %session.repo_dir.display(), "session saved");
    Ok(Some(session))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
