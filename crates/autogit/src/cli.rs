//! Clap CLI definitions for the `autogit` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// autogit -- keep a working tree and its remote branch in sync.
///
/// Captures local edits, rebases onto the remote and pushes, walking the
/// user through interrupted rebases and conflicts along the way.
#[derive(Parser, Debug)]
#[command(
    name = "autogit",
    about = "Interactive git sync for a single branch",
    long_about = "Captures local edits, rebases onto the remote branch and pushes. \
                  Interrupted rebases and conflicts are resolved through short menus.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding autogit_config.json and autogit.toml
    /// (default: $AUTOGIT_HOME, then the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture, pull and push the configured repository (default).
    Sync(SyncArgs),

    /// Preview a static site locally, then optionally publish it.
    Preview,

    /// Inspect or reset the saved configuration.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

/// Arguments for `autogit sync`.
#[derive(Args, Debug, Default, Clone)]
pub struct SyncArgs {
    /// Ignore the saved directory and remote and ask for them again.
    #[arg(long)]
    pub reconfigure: bool,

    /// Branch to pull and push (overrides the settings file).
    #[arg(long)]
    pub branch: Option<String>,

    /// Warn about other running git processes before touching the tree.
    #[arg(long)]
    pub check_processes: bool,
}

/// Arguments for `autogit config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the saved session and the effective settings.
    Show,
    /// Delete the saved session.
    Reset,
}

/// Arguments for `autogit completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: Shell,
}
