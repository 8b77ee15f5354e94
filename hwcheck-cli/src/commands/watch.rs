//! Implementation of the 'watch-parent' subcommand.
//!
//! Arms the parent-liveness monitor and then blocks. The process ends when
//! the watcher observes the parent's exit (event-queue strategy) or when the
//! kernel delivers the death signal (kernel-signal strategy). A watcher that
//! stops without terminating turns into a command failure.

use crate::cli::WatchArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::logging::get_timestamp;
use crate::output;

use hwcheck_core::parent_watch::default_event_source;
use hwcheck_core::{CoreConfig, CoreError, ProcessEventSource, WatcherStatus, setup_with_config};
use log::info;

/// Builds the watch configuration from the environment and the arguments.
pub fn watch_config(args: &WatchArgs) -> CliResult<CoreConfig> {
    let mut config = CoreConfig::from_env().cli_context("Invalid environment configuration")?;
    if let Some(strategy) = args.strategy {
        config.watch_strategy = strategy;
    }
    if let Some(code) = args.exit_code {
        config.parent_exit_code = code;
    }
    config.validate()?;
    Ok(config)
}

/// Blocks until the watcher stops and reports why it did not terminate us.
pub fn await_watcher(status: &WatcherStatus) -> CliResult<()> {
    let reason = match status.wait() {
        Some(stopped) => stopped.to_string(),
        None => "watcher exited without a reason".to_string(),
    };
    Err(CoreError::OperationFailed(format!(
        "Parent watch stopped: {}",
        reason
    )))
}

/// Arms the monitor and blocks until the process is terminated.
pub fn run_watch(args: WatchArgs) -> CliResult<()> {
    let config = watch_config(&args)?;

    let status = setup_with_config(&config).cli_context("Failed to arm parent watch")?;

    let parent = default_event_source().parent_pid();
    info!(
        "Watching parent process {} ({} strategy, exit code {})",
        parent, config.watch_strategy, config.parent_exit_code
    );
    output::print_info("Parent", parent);
    output::print_info("Strategy", config.watch_strategy);
    output::print_info("Armed at", get_timestamp());

    match status {
        Some(status) => await_watcher(&status),
        // The kernel signal ends the process; there is nothing to wait on.
        None => loop {
            std::thread::park();
        },
    }
}
