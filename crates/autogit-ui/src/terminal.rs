//! Terminal detection utilities.

use std::env;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Returns `true` if stdin is connected to a terminal.
///
/// When it is not, prompts fall back to plain line reads so answers can be
/// piped in.
pub fn stdin_is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdin())
}

/// Determines if ANSI color codes should be used.
///
/// Respects standard conventions:
/// - `NO_COLOR` (any value): disables color (<https://no-color.org/>)
/// - `CLICOLOR=0`: disables color
/// - `TERM=dumb`: disables color
/// - `CLICOLOR_FORCE` (any value): forces color even in non-TTY
/// - Falls back to TTY detection
pub fn supports_color() -> bool {
    color_from_env(
        env::var_os("NO_COLOR").is_some(),
        env::var("CLICOLOR").ok().as_deref(),
        env::var("TERM").ok().as_deref(),
        env::var_os("CLICOLOR_FORCE").is_some(),
        is_tty(),
    )
}

fn color_from_env(
    no_color: bool,
    clicolor: Option<&str>,
    term: Option<&str>,
    force: bool,
    tty: bool,
) -> bool {
    if no_color || clicolor == Some("0") || term == Some("dumb") {
        return false;
    }
    force || tty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_beats_force() {
        assert!(!color_from_env(true, None, None, true, true));
    }

    #[test]
    fn dumb_terminal_disables_color() {
        assert!(!color_from_env(false, None, Some("dumb"), false, true));
        assert!(!color_from_env(false, Some("0"), Some("xterm"), false, true));
    }

    #[test]
    fn force_enables_color_without_tty() {
        assert!(color_from_env(false, None, Some("xterm"), true, false));
        assert!(!color_from_env(false, None, Some("xterm"), false, false));
    }
}
