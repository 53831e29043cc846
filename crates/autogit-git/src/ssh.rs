//! SSH credential handshake.
//!
//! Git hosts answer `ssh -T git@host` with a greeting instead of a shell.
//! The greeting arrives on stderr and the exit status is non-zero even on
//! success, so the text is the only reliable signal.

use crate::commands::{capture, Result};
use std::process::Command;
use tracing::debug;

/// Phrase hosts print once the key has been accepted.
const AUTH_OK_MARKER: &str = "successfully authenticated";

/// Host used when none can be derived from the remote URL.
pub const DEFAULT_SSH_HOST: &str = "git@github.com";

/// Derive the `user@host` part of an scp-style remote such as
/// `git@github.com:owner/repo.git`.
///
/// Returns `None` for URLs without a `user@host:` prefix.
pub fn ssh_host_from_url(url: &str) -> Option<&str> {
    let (host, path) = url.split_once(':')?;
    if host.contains('@') && !host.contains('/') && !path.is_empty() {
        Some(host)
    } else {
        None
    }
}

/// Returns `true` if the handshake output reports an accepted key.
pub fn handshake_succeeded(stdout: &str, stderr: &str) -> bool {
    stderr.contains(AUTH_OK_MARKER) || stdout.contains(AUTH_OK_MARKER)
}

/// Attempt a no-op authenticated handshake against `host`.
///
/// Batch mode keeps ssh from ever stopping to ask for a passphrase or host
/// confirmation.
///
/// # Errors
///
/// Returns [`crate::commands::GitError::SpawnError`] if `ssh` cannot be run.
pub fn verify_ssh(host: &str) -> Result<bool> {
    let out = capture(
        Command::new("ssh")
            .args(["-T", "-o", "BatchMode=yes"])
            .arg(host),
    )?;
    debug!(host, code = ?out.code, "ssh handshake");
    Ok(handshake_succeeded(&out.stdout, &out.stderr))
}
