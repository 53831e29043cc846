//! Ayu color theme and styling functions for autogit console output.
//!
//! Uses the Ayu Dark color palette for consistent terminal styling.
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Only outcomes get color: success lines green, warnings yellow, failures
//! red, prompts and menu keys blue. Captured command output stays plain.

use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub const ICON_PASS: &str = "\u{2713}"; // check mark
pub const ICON_WARN: &str = "\u{26A0}"; // warning sign
pub const ICON_FAIL: &str = "\u{2716}"; // heavy x
pub const ICON_INFO: &str = "\u{2139}"; // information source
pub const ICON_STEP: &str = "\u{2192}"; // rightwards arrow

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

/// Applies truecolor foreground to a string, falling back to plain text
/// when color is not supported.
fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

/// Applies truecolor foreground + bold to a string.
fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

/// Renders text with pass (green) styling.
pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

/// Renders text with warning (yellow) styling.
pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

/// Renders text with fail (red) styling.
pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

/// Renders text with muted (gray) styling.
pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

/// Renders text with accent (blue) styling.
pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

/// Renders text in bold.
pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Line renderers
// ---------------------------------------------------------------------------

/// `✓ message` in green.
pub fn render_pass_line(msg: &str) -> String {
    format!("{} {}", color_str(ICON_PASS, PASS), msg)
}

/// `⚠ message` in yellow.
pub fn render_warn_line(msg: &str) -> String {
    format!("{} {}", color_str(ICON_WARN, WARN), render_warn(msg))
}

/// `✖ message` in red.
pub fn render_fail_line(msg: &str) -> String {
    format!("{} {}", color_str(ICON_FAIL, FAIL), render_fail(msg))
}

/// `ℹ message` with a blue icon.
pub fn render_info_line(msg: &str) -> String {
    format!("{} {}", color_str(ICON_INFO, ACCENT), msg)
}

/// `→ message` with a muted arrow, used for workflow steps.
pub fn render_step_line(msg: &str) -> String {
    format!("{} {}", color_str(ICON_STEP, MUTED), msg)
}

/// Renders a menu entry as `key) label` with the key in bold accent.
pub fn render_menu_option(key: &str, label: &str) -> String {
    format!("{}) {}", color_bold_str(key, ACCENT), label)
}

/// Renders a prompt, accented, with the accepted answers muted.
///
/// `render_prompt("Continue?", "Y/N")` yields `Continue? (Y/N)`.
pub fn render_prompt(question: &str, answers: &str) -> String {
    if answers.is_empty() {
        render_accent(question)
    } else {
        format!("{} {}", render_accent(question), render_muted(&format!("({answers})")))
    }
}
