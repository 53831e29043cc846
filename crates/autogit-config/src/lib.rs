//! Configuration management for autogit.
//!
//! This crate handles the persisted session record (`autogit_config.json`),
//! the layered tool settings (`autogit.toml` plus `AUTOGIT_*` variables),
//! and discovery of the directory both live in.

pub mod config;
pub mod config_dir;
