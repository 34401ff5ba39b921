//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod replay;
pub mod run;
pub mod utils;

// Re-export main command functions
pub use replay::{execute_replay, ReplayArgs};
pub use run::{build_framer, execute_run, validate_args, RunArgs};
pub use utils::{display_catalog, display_version};
