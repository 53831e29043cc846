//! Error and outcome types for the sync workflow.

use std::fmt;

use autogit_config::config::ConfigError;
use autogit_git::commands::GitError;

/// Error type for runs that cannot continue.
///
/// Expected endings (declined confirmation, unresolved conflict, failed
/// handshake) are not errors; they are reported as a [`SyncOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid selection '{input}' at the {menu} menu")]
    InvalidSelection { menu: &'static str, input: String },

    #[error("input closed while waiting for an answer")]
    InputClosed,

    #[error("site build failed (exit code {code:?})")]
    PublishFailed { code: Option<i32> },
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Tree synchronized (or resolved by one of the forced strategies).
    Success,
    /// The user declined to continue at a confirmation or quit a menu.
    UserAborted,
    /// Automation stopped with conflicts left for the user.
    ConflictUnresolved,
    /// The SSH handshake did not report success.
    AuthenticationFailed,
}

impl SyncOutcome {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::UserAborted => "user_aborted",
            Self::ConflictUnresolved => "conflict_unresolved",
            Self::AuthenticationFailed => "authentication_failed",
        }
    }

    /// Process exit status for this outcome.
    ///
    /// Quitting on purpose is not a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success | Self::UserAborted => 0,
            Self::ConflictUnresolved | Self::AuthenticationFailed => 1,
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
