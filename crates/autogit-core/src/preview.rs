//! Local preview and publish for a static site generator.
//!
//! Starts `<generator> server` in the chosen directory, keeps it running
//! until the user presses Enter, then optionally runs `<generator>` once to
//! publish. Output of both is captured and echoed verbatim.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use autogit_git::commands::{capture, CommandOutput, GitError};
use autogit_ui::styles;
use tracing::{debug, info};

use crate::console::{ask_until, parse_yes_no, Console};
use crate::error::{SyncError, SyncOutcome};

/// A site generator command line such as `hugo` or `hugo --source site`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteGenerator {
    program: String,
    args: Vec<String>,
}

impl SiteGenerator {
    /// Split `command` on whitespace into program and leading arguments.
    ///
    /// Returns `None` for a blank command.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Name shown to the user.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self, dir: &Path, extra: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).args(extra).current_dir(dir);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> GitError {
        GitError::SpawnError {
            program: self.program.clone(),
            source,
        }
    }
}

/// Drain `source` on a background thread so the child never blocks on a
/// full pipe.
fn drain<R: Read + Send + 'static>(source: Option<R>) -> Option<JoinHandle<String>> {
    let mut source = source?;
    Some(thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = source.read_to_end(&mut buf) {
            debug!(error = %e, "reading server output failed");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }))
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn echo_output<C: Console + ?Sized>(console: &mut C, label: &str, out: &CommandOutput) {
    if !out.stdout.is_empty() {
        console.say(&format!("{label} output:"));
        console.say(&out.stdout);
    }
    if !out.stderr.is_empty() {
        console.warn("Errors:");
        console.say(&out.stderr);
    }
}

/// Run the preview server until the user presses Enter.
///
/// # Errors
///
/// Returns [`SyncError::Git`] if the generator cannot be started.
pub fn serve<C: Console + ?Sized>(
    console: &mut C,
    generator: &SiteGenerator,
    dir: &Path,
) -> Result<(), SyncError> {
    console.step(&format!("Starting {} server...", generator.display()));
    let mut child = generator
        .command(dir, &["server"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| generator.spawn_error(e))?;
    info!(pid = child.id(), "preview server started");
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    // End of input counts as Enter.
    let prompt = styles::render_prompt("Server started. Press Enter to stop it and continue", "");
    let answered = console.read_line(&prompt);

    if let Err(e) = child.kill() {
        debug!(error = %e, "server already exited");
    }
    let status = child.wait()?;
    answered?;

    let captured = CommandOutput {
        code: status.code(),
        stdout: collect(stdout).trim_end().to_string(),
        stderr: collect(stderr).trim().to_string(),
    };
    echo_output(console, "Server", &captured);
    console.pass("Server stopped.");
    Ok(())
}

/// Run the generator once to build the site.
///
/// # Errors
///
/// [`SyncError::PublishFailed`] when the build exits non-zero (its output
/// has already been shown).
pub fn publish<C: Console + ?Sized>(
    console: &mut C,
    generator: &SiteGenerator,
    dir: &Path,
) -> Result<(), SyncError> {
    console.step("Publishing the site...");
    let out = capture(&mut generator.command(dir, &[]))?;
    echo_output(console, "Publish", &out);
    if !out.success() {
        return Err(SyncError::PublishFailed { code: out.code });
    }
    console.pass("Site published.");
    Ok(())
}

/// Preview the site in `dir`, then offer to publish it.
///
/// Declining to publish still counts as success.
///
/// # Errors
///
/// Propagates spawn failures, a failed build, and closed input at the
/// publish question.
pub fn run_preview<C: Console + ?Sized>(
    console: &mut C,
    generator: &SiteGenerator,
    dir: &Path,
) -> Result<SyncOutcome, SyncError> {
    console.say(&format!("Selected directory: {}", dir.display()));
    serve(console, generator, dir)?;

    let question = format!("Publish the site (run '{}')?", generator.display());
    let prompt = styles::render_prompt(&question, "Y/N");
    if ask_until(console, &prompt, parse_yes_no)? {
        publish(console, generator, dir)?;
    } else {
        console.say("Finished without publishing.");
    }
    Ok(SyncOutcome::Success)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
