//! Implementation of the 'probe' subcommand.

use crate::cli::ProbeArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

use hwcheck_core::{CapabilityProber, CoreConfig, CoreError, HardwareCapabilities, default_backend};
use log::debug;

/// Builds the probe configuration from the environment and the arguments.
pub fn probe_config(args: &ProbeArgs) -> CliResult<CoreConfig> {
    let mut config = CoreConfig::from_env().cli_context("Invalid environment configuration")?;
    if let Some(width) = args.width {
        config.reference_width = width;
    }
    if let Some(height) = args.height {
        config.reference_height = height;
    }
    config.validate()?;
    Ok(config)
}

/// Renders capabilities plus their signature as pretty JSON.
pub fn capabilities_json(caps: &HardwareCapabilities) -> CliResult<String> {
    let mut value = serde_json::to_value(caps)
        .map_err(|e| CoreError::OperationFailed(format!("Failed to serialize capabilities: {}", e)))?;
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "signature".to_string(),
            serde_json::Value::String(output::format_signature(caps.signature())),
        );
    }
    serde_json::to_string_pretty(&value)
        .map_err(|e| CoreError::OperationFailed(format!("Failed to serialize capabilities: {}", e)))
}

/// Runs the probe and prints the result.
pub fn run_probe(args: ProbeArgs) -> CliResult<()> {
    let config = probe_config(&args)?;
    debug!(
        "Probing hardware encoders at {}x{}",
        config.reference_width, config.reference_height
    );

    let caps = CapabilityProber::with_config(default_backend(), &config).check_all_capabilities();
    caps.log_capabilities();

    if args.json {
        println!("{}", capabilities_json(&caps)?);
    } else {
        output::print_heading("Hardware codec capabilities");
        output::print_capability_table(&caps);
        output::print_info("Summary", caps.describe());
        output::print_info("Signature", output::format_signature(caps.signature()));
    }
    Ok(())
}
