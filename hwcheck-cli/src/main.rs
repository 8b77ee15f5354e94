// hwcheck-cli/src/main.rs
//
// Entry point for the `hwcheck` binary.
//
// Responsibilities include:
// - Parsing user-provided arguments.
// - Setting up console logging.
// - Dispatching to the probe, signature and watch-parent commands.
// - Managing process exit codes based on success or failure.

use clap::Parser;
use hwcheck_cli::{Cli, Commands, run_probe, run_signature, run_watch};
use hwcheck_core::logging;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Probe(args) => run_probe(args),
        Commands::Signature(args) => run_signature(args),
        Commands::WatchParent(args) => run_watch(args),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
