//! `autogit preview` -- serve a static site locally, then optionally publish.

use anyhow::{bail, Result};
use autogit_core::console::{Console, TerminalConsole};
use autogit_core::preview::{run_preview, SiteGenerator};
use autogit_core::setup::{candidate_dirs, choose_directory};
use autogit_core::SyncOutcome;

use crate::context::RuntimeContext;

/// Execute the `autogit preview` command.
pub fn run(ctx: &RuntimeContext) -> Result<SyncOutcome> {
    let settings = ctx.settings()?;
    let Some(generator) = SiteGenerator::parse(&settings.site_generator) else {
        bail!("the site_generator setting is empty");
    };

    let mut console = TerminalConsole::new();
    let candidates = candidate_dirs(ctx.start_dir());
    let Some(dir) = choose_directory(&mut console, &candidates)? else {
        console.say("Exited.");
        return Ok(SyncOutcome::UserAborted);
    };

    Ok(run_preview(&mut console, &generator, &dir)?)
}
