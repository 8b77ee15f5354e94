// hwcheck-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use hwcheck_core::WatchStrategy;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "hwcheck: host capability checks for streaming helpers",
    long_about = "Reports hardware H.264/H.265 codec availability and watches the parent process on behalf of helper processes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probes hardware encoders and decoders and prints the result
    Probe(ProbeArgs),
    /// Prints the packed capability signature, or decodes one
    Signature(SignatureArgs),
    /// Arms the parent-liveness monitor and waits until the parent exits
    #[command(name = "watch-parent")]
    WatchParent(WatchArgs),
}

#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Print the capabilities as JSON
    #[arg(long)]
    pub json: bool,

    /// Optional: Override the encoder query width
    #[arg(long, value_name = "PIXELS", env = "HWCHECK_REFERENCE_WIDTH")]
    pub width: Option<i32>,

    /// Optional: Override the encoder query height
    #[arg(long, value_name = "PIXELS", env = "HWCHECK_REFERENCE_HEIGHT")]
    pub height: Option<i32>,
}

#[derive(Parser, Debug)]
pub struct SignatureArgs {
    /// Decode this signature (decimal or 0x-prefixed hex) instead of probing
    #[arg(long, value_name = "SIGNATURE")]
    pub decode: Option<String>,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// How to watch the parent: event-queue or kernel-signal
    #[arg(long, value_name = "STRATEGY", env = "HWCHECK_WATCH_STRATEGY")]
    pub strategy: Option<WatchStrategy>,

    /// Exit status used once the parent has exited (1-255)
    #[arg(
        long,
        value_name = "CODE",
        env = "HWCHECK_PARENT_EXIT_CODE",
        value_parser = clap::value_parser!(i32).range(1..=255)
    )]
    pub exit_code: Option<i32>,
}
