//! `autogit config` -- show or reset the saved configuration.

use anyhow::{Context, Result};
use autogit_config::config::{SessionStore, SETTINGS_FILE_NAME};
use autogit_ui::styles;
use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;

/// Execute the `autogit config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    let store = ctx.session_store();

    match &args.command {
        ConfigCommands::Show => {
            let session = store
                .load()
                .with_context(|| format!("failed to read {}", store.path().display()))?;
            let settings = ctx.settings()?;

            println!("{}", styles::render_bold("Session"));
            println!("  record: {}", store.path().display());
            match &session {
                Some(s) => {
                    println!("  repo_dir: {}", s.repo_dir.display());
                    println!("  remote_url: {}", s.remote_url);
                }
                None => println!("  {}", styles::render_muted("(not configured)")),
            }

            println!();
            println!("{}", styles::render_bold("Settings"));
            println!(
                "  file: {}",
                ctx.config_dir.join(SETTINGS_FILE_NAME).display()
            );
            print!("{}", indent(&to_pretty(&settings)?));
        }

        ConfigCommands::Reset => {
            let removed = store
                .clear()
                .with_context(|| format!("failed to remove {}", store.path().display()))?;
            if removed {
                println!(
                    "{}",
                    styles::render_pass_line(&format!("Removed {}", store.path().display()))
                );
            } else {
                println!("No saved configuration at {}", store.path().display());
            }
        }
    }

    Ok(())
}

fn to_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize settings")
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("  {l}\n")).collect()
}
