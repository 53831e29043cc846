//! Command handlers, one module per subcommand.

pub mod completion;
pub mod config_cmd;
pub mod preview;
pub mod sync_cmd;
pub mod version;
