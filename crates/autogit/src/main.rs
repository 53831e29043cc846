//! `autogit` -- interactive git sync for a single branch.
//!
//! Parses CLI arguments with clap, resolves the runtime context, dispatches
//! to a command handler and turns its outcome into the process exit status.

mod cli;
mod commands;
mod context;

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use autogit_core::SyncOutcome;
use clap::Parser;

use cli::{Cli, Commands, SyncArgs};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();

    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                "autogit=debug,autogit_core=debug,autogit_git=debug,autogit_config=debug",
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match dispatch(cli) {
        Ok(outcome) => {
            tracing::debug!(%outcome, "exiting");
            std::process::exit(outcome.exit_code());
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn dispatch(cli: Cli) -> Result<SyncOutcome> {
    let ctx = RuntimeContext::from_global_args(&cli.global)?;

    match cli.command {
        Some(Commands::Sync(args)) => commands::sync_cmd::run(&ctx, &args),
        Some(Commands::Preview) => commands::preview::run(&ctx),
        Some(Commands::Config(args)) => {
            commands::config_cmd::run(&ctx, &args).map(|()| SyncOutcome::Success)
        }
        Some(Commands::Completion(args)) => {
            commands::completion::run(&args).map(|()| SyncOutcome::Success)
        }
        Some(Commands::Version) => commands::version::run().map(|()| SyncOutcome::Success),
        None => commands::sync_cmd::run(&ctx, &SyncArgs::default()),
    }
}
