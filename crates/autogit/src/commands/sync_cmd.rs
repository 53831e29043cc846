//! `autogit sync` -- capture, pull and push the configured repository.
//!
//! Resolves the session (saved record or interactive setup), then hands it
//! to the workflow controller together with the effective settings.

use anyhow::Result;
use autogit_config::config::Settings;
use autogit_config::config_dir::ensure_config_dir;
use autogit_core::console::TerminalConsole;
use autogit_core::setup::{candidate_dirs, resolve_session};
use autogit_core::{SshAuthenticator, SyncOutcome, SyncWorkflow};
use tracing::debug;

use crate::cli::SyncArgs;
use crate::context::RuntimeContext;

/// Apply command-line overrides on top of the loaded settings.
fn apply_overrides(mut settings: Settings, args: &SyncArgs) -> Settings {
    if let Some(branch) = &args.branch {
        settings.branch = branch.clone();
    }
    if args.check_processes {
        settings.check_processes = true;
    }
    settings
}

/// Execute the `autogit sync` command.
pub fn run(ctx: &RuntimeContext, args: &SyncArgs) -> Result<SyncOutcome> {
    let settings = apply_overrides(ctx.settings()?, args);
    debug!(?settings, config_dir = %ctx.config_dir.display(), "effective settings");

    ensure_config_dir(&ctx.config_dir)?;
    let mut console = TerminalConsole::new();
    let store = ctx.session_store();
    let candidates = candidate_dirs(ctx.start_dir());
    let session = resolve_session(
        &mut console,
        &store,
        &candidates,
        &settings,
        args.reconfigure,
    )?;
    let Some(session) = session else {
        return Ok(SyncOutcome::UserAborted);
    };

    let mut workflow = SyncWorkflow::new(&session, &settings, &mut console, &SshAuthenticator)?;
    Ok(workflow.run()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overrides_replace_branch_and_enable_guard() {
        let args = SyncArgs {
            reconfigure: false,
            branch: Some("main".to_string()),
            check_processes: true,
        };
        let settings = apply_overrides(Settings::default(), &args);
        assert_eq!(settings.branch, "main");
        assert!(settings.check_processes);
        assert_eq!(settings.remote_name, "origin");
    }

    #[test]
    fn absent_overrides_keep_settings() {
        let base = Settings {
            branch: "pages".to_string(),
            check_processes: true,
            ..Settings::default()
        };
        let settings = apply_overrides(base.clone(), &SyncArgs::default());
        assert_eq!(settings, base);
    }
}
