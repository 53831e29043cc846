//! Line-based console interaction.
//!
//! All branching decisions in the workflow come from single-character or
//! free-text answers. [`Console`] is the seam: [`TerminalConsole`] talks to
//! the user, [`ScriptedConsole`] replays canned answers and records
//! everything that was shown.
//!
//! Re-prompting on invalid input is a loop over attempts ([`ask_until`]);
//! it ends only on a valid answer or end of input.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use autogit_ui::styles;
use autogit_ui::terminal::stdin_is_tty;

use crate::error::SyncError;

/// Kind of message written to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Step,
    Pass,
    Info,
    Warn,
    Fail,
}

/// Interactive console used by the workflow.
pub trait Console {
    /// Show `prompt` and read one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Write a message.
    fn emit(&mut self, tone: Tone, msg: &str);

    fn say(&mut self, msg: &str) {
        self.emit(Tone::Plain, msg);
    }

    fn step(&mut self, msg: &str) {
        self.emit(Tone::Step, msg);
    }

    fn pass(&mut self, msg: &str) {
        self.emit(Tone::Pass, msg);
    }

    fn info(&mut self, msg: &str) {
        self.emit(Tone::Info, msg);
    }

    fn warn(&mut self, msg: &str) {
        self.emit(Tone::Warn, msg);
    }

    fn fail(&mut self, msg: &str) {
        self.emit(Tone::Fail, msg);
    }
}

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

/// Ask once and return the trimmed answer.
///
/// # Errors
///
/// [`SyncError::InputClosed`] on end of input, [`SyncError::Io`] on read
/// failure.
pub fn ask<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<String, SyncError> {
    match console.read_line(prompt)? {
        Some(line) => Ok(line.trim().to_string()),
        None => Err(SyncError::InputClosed),
    }
}

/// Ask until `parse` accepts the answer.
///
/// A rejected answer prints the message returned by `parse` as a warning
/// and asks again.
///
/// # Errors
///
/// [`SyncError::InputClosed`] if input ends before a valid answer arrives.
pub fn ask_until<C, T, F>(console: &mut C, prompt: &str, mut parse: F) -> Result<T, SyncError>
where
    C: Console + ?Sized,
    F: FnMut(&str) -> Result<T, String>,
{
    loop {
        let answer = ask(console, prompt)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(reason) => console.warn(&reason),
        }
    }
}

/// Parse a `Y`/`N` answer, case-insensitively.
pub fn parse_yes_no(answer: &str) -> Result<bool, String> {
    match answer.to_ascii_uppercase().as_str() {
        "Y" => Ok(true),
        "N" => Ok(false),
        _ => Err("Please answer Y or N.".to_string()),
    }
}

/// Ask a yes/no question until answered.
///
/// # Errors
///
/// [`SyncError::InputClosed`] if input ends first.
pub fn confirm<C: Console + ?Sized>(console: &mut C, question: &str) -> Result<bool, SyncError> {
    let prompt = styles::render_prompt(question, "Y/N");
    ask_until(console, &prompt, parse_yes_no)
}

// ---------------------------------------------------------------------------
// Terminal console
// ---------------------------------------------------------------------------

/// Console bound to the process's stdin/stdout.
///
/// Uses dialoguer line editing when stdin is a terminal and plain line
/// reads otherwise, so answers can be piped in.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if stdin_is_tty() {
            let answer = dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(io::Error::other)?;
            return Ok(Some(answer));
        }

        let mut stdout = io::stdout();
        write!(stdout, "{prompt}: ")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn emit(&mut self, tone: Tone, msg: &str) {
        match tone {
            Tone::Plain => println!("{msg}"),
            Tone::Step => println!("{}", styles::render_step_line(msg)),
            Tone::Pass => println!("{}", styles::render_pass_line(msg)),
            Tone::Info => println!("{}", styles::render_info_line(msg)),
            Tone::Warn => println!("{}", styles::render_warn_line(msg)),
            Tone::Fail => eprintln!("{}", styles::render_fail_line(msg)),
        }
    }
}

// ---------------------------------------------------------------------------
// Scripted console
// ---------------------------------------------------------------------------

/// Console that answers from a fixed script and records the session.
///
/// Prompts are recorded as `? <prompt>`, messages as plain lines.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Everything shown so far.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Number of prompts that were shown.
    pub fn prompts(&self) -> usize {
        self.transcript.iter().filter(|l| l.starts_with("? ")).count()
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Returns `true` if any recorded line contains `needle`.
    pub fn shows(&self, needle: &str) -> bool {
        self.transcript.iter().any(|l| l.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.transcript.push(format!("? {prompt}"));
        Ok(self.answers.pop_front())
    }

    fn emit(&mut self, _tone: Tone, msg: &str) {
        self.transcript.push(msg.to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
