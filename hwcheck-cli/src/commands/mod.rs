//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `probe` command.
pub mod probe;

/// Module containing the implementation of the `signature` command.
pub mod signature;

/// Module containing the implementation of the `watch-parent` command.
/// This command arms the parent-liveness monitor and blocks.
pub mod watch;
