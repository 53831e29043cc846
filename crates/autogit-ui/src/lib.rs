//! Terminal UI components for autogit.
//!
//! Provides Ayu-themed color styling and terminal detection for console
//! prompts and status lines.

pub mod styles;
pub mod terminal;
