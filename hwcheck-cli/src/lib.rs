// hwcheck-cli/src/lib.rs
//
// Library portion of the hwcheck CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ProbeArgs, SignatureArgs, WatchArgs};
pub use commands::probe::run_probe;
pub use commands::signature::run_signature;
pub use commands::watch::run_watch;
