//! Detection of other running `git` processes.

use crate::commands::{capture, Result};
use std::process::Command;

/// A running process as reported by `ps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub command: String,
}

/// Parse `ps -eo pid=,comm=` output, keeping entries whose command name is
/// exactly `name`.
pub fn parse_ps(output: &str, name: &str) -> Vec<ProcessEntry> {
    output
        .lines()
        .filter_map(|line| {
            let (pid, command) = line.trim().split_once(char::is_whitespace)?;
            let command = command.trim();
            let pid = pid.parse().ok()?;
            (command == name).then(|| ProcessEntry {
                pid,
                command: command.to_string(),
            })
        })
        .collect()
}

/// List running processes named `name`, excluding this process.
///
/// A failing `ps` is treated as "nothing found"; only a spawn failure is an
/// error.
///
/// # Errors
///
/// Returns [`crate::commands::GitError::SpawnError`] if `ps` cannot be run.
pub fn running_processes(name: &str) -> Result<Vec<ProcessEntry>> {
    let out = capture(Command::new("ps").args(["-eo", "pid=,comm="]))?;
    if !out.success() {
        return Ok(Vec::new());
    }
    let own = std::process::id();
    Ok(parse_ps(&out.stdout, name)
        .into_iter()
        .filter(|p| p.pid != own)
        .collect())
}
