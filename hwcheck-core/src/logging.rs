//! Console logging setup for hwcheck binaries.
//!
//! The library itself only emits through the `log` facade; this module installs
//! an `env_logger` backend with a level-coloured format. `RUST_LOG` is honoured
//! on top of the level chosen here.

use log::{Level, LevelFilter, debug};
use owo_colors::OwoColorize;
use std::io::Write;

/// Initialize the logger for hwcheck
///
/// Uses `Debug` when `verbose` is set, `Info` otherwise.
pub fn init(verbose: bool) {
    init_with_level(level_for(verbose));
}

/// Maps the verbose flag onto a level filter.
#[must_use]
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize the logger with a specific log level
///
/// Calling this more than once keeps the first logger.
pub fn init_with_level(level: LevelFilter) {
    let result = env_logger::Builder::new()
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            let level_str = match record.level() {
                Level::Error => "ERROR".bright_red().to_string(),
                Level::Warn => "WARN ".yellow().to_string(),
                Level::Info => "INFO ".green().to_string(),
                Level::Debug => "DEBUG".blue().to_string(),
                Level::Trace => "TRACE".magenta().to_string(),
            };

            writeln!(buf, "{} {} {}", timestamp, level_str, record.args())
        })
        .filter(None, level)
        .parse_default_env()
        .try_init();

    if result.is_ok() {
        debug!("Logger initialized with level: {}", level);
    }
}
