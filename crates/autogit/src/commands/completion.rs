//! `autogit completion` -- generate shell completions.
//!
//! Uses `clap_complete` to generate shell completion scripts for
//! Bash, Zsh, Fish, Elvish and PowerShell.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionArgs};

/// Execute the `autogit completion` command.
pub fn run(args: &CompletionArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "autogit", &mut std::io::stdout());
    Ok(())
}
