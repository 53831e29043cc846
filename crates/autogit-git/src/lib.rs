//! Git integration for autogit.
//!
//! This crate provides subprocess wrappers for `git`, the SSH credential
//! handshake, process probing, and the on-disk repository facts (lock
//! artifact, rebase markers) the sync workflow branches on.

pub mod commands;
pub mod gitdir;
pub mod process;
pub mod ssh;
