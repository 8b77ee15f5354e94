//! Implementation of the 'signature' subcommand.

use crate::cli::SignatureArgs;
use crate::error::CliResult;
use crate::output;

use hwcheck_core::{HardwareCapabilities, get_capability_signature};

/// Prints the current signature, or decodes the one given with `--decode`.
pub fn run_signature(args: SignatureArgs) -> CliResult<()> {
    match args.decode {
        Some(text) => {
            let caps = HardwareCapabilities::parse_signature(&text)?;
            output::print_info("Signature", output::format_signature(caps.signature()));
            output::print_capability_table(&caps);
            output::print_info("Summary", caps.describe());
        }
        None => {
            println!("{}", output::format_signature(get_capability_signature()));
        }
    }
    Ok(())
}
