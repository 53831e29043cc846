//! `autogit version` -- print version, build info, and platform.

use anyhow::Result;

/// Version string. Set at compile time via Cargo.toml (workspace version).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build identifier. Can be overridden via environment variable at build time.
const BUILD: &str = {
    match option_env!("AUTOGIT_BUILD") {
        Some(b) => b,
        None => "dev",
    }
};

fn version_line() -> String {
    format!(
        "autogit version {} ({}) {}/{}",
        VERSION,
        BUILD,
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Execute the `autogit version` command.
pub fn run() -> Result<()> {
    println!("{}", version_line());
    Ok(())
}
