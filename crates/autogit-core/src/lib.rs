//! Core of autogit: the sync workflow controller, the console seam it
//! talks through, interactive session setup, and the site preview flow.

pub mod console;
pub mod error;
pub mod preview;
pub mod setup;
pub mod workflow;

pub use error::{SyncError, SyncOutcome};
pub use workflow::{Authenticator, SshAuthenticator, SyncWorkflow};
