//! Configuration structures and constants for the hwcheck-core library.
//!
//! This module provides the configuration for the capability prober (reference
//! resolution) and the parent-liveness monitor (strategy,
//! exit code, watcher thread name).

mod builder;

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub use builder::CoreConfigBuilder;

// Default constants

/// Default width of the encoder capability query.
/// Hardware support at other resolutions may differ; 1080p is the
/// resolution streaming sessions are sized against.
pub const DEFAULT_REFERENCE_WIDTH: i32 = 1920;

/// Default height of the encoder capability query.
pub const DEFAULT_REFERENCE_HEIGHT: i32 = 1080;

/// Exit status used when the watcher terminates the process after the
/// parent has exited. Must be non-zero.
pub const DEFAULT_PARENT_EXIT_CODE: i32 = 1;

/// Exit statuses the watcher may use. Zero would report a clean exit.
pub const PARENT_EXIT_CODE_RANGE: RangeInclusive<i32> = 1..=255;

/// Name given to the detached parent-watch thread.
pub const DEFAULT_WATCHER_THREAD_NAME: &str = "hwcheck-parent-watch";

/// Environment variable overriding the reference width.
pub const ENV_REFERENCE_WIDTH: &str = "HWCHECK_REFERENCE_WIDTH";
/// Environment variable overriding the reference height.
pub const ENV_REFERENCE_HEIGHT: &str = "HWCHECK_REFERENCE_HEIGHT";
/// Environment variable overriding the parent exit code.
pub const ENV_PARENT_EXIT_CODE: &str = "HWCHECK_PARENT_EXIT_CODE";
/// Environment variable selecting the watch strategy.
pub const ENV_WATCH_STRATEGY: &str = "HWCHECK_WATCH_STRATEGY";

/// How the parent-liveness monitor learns about the parent's death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchStrategy {
    /// One-shot exit notification on a kernel event queue, observed by a
    /// detached watcher thread.
    #[default]
    EventQueue,
    /// Ask the kernel to signal this process when the parent dies
    /// (`PR_SET_PDEATHSIG`, Linux only).
    KernelSignal,
}

impl fmt::Display for WatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchStrategy::EventQueue => f.write_str("event-queue"),
            WatchStrategy::KernelSignal => f.write_str("kernel-signal"),
        }
    }
}

impl FromStr for WatchStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event-queue" | "event_queue" | "queue" => Ok(WatchStrategy::EventQueue),
            "kernel-signal" | "kernel_signal" | "pdeathsig" => Ok(WatchStrategy::KernelSignal),
            other => Err(CoreError::Config(format!(
                "unknown watch strategy '{}' (expected 'event-queue' or 'kernel-signal')",
                other
            ))),
        }
    }
}

/// Main configuration structure for the hwcheck-core library.
///
/// All fields have sensible defaults; most callers use `CoreConfig::default()`
/// or `CoreConfig::from_env()`.
///
/// # Examples
///
/// ```rust
/// use hwcheck_core::config::{CoreConfigBuilder, WatchStrategy};
///
/// let config = CoreConfigBuilder::new()
///     .reference_resolution(3840, 2160)
///     .parent_exit_code(2)
///     .watch_strategy(WatchStrategy::EventQueue)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Width passed to the encoder supported-properties query
    pub reference_width: i32,

    /// Height passed to the encoder supported-properties query
    pub reference_height: i32,

    /// Exit status used when the parent is observed to have exited
    pub parent_exit_code: i32,

    /// Mechanism used to watch the parent process
    pub watch_strategy: WatchStrategy,

    /// Name of the detached watcher thread
    pub watcher_thread_name: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            reference_width: DEFAULT_REFERENCE_WIDTH,
            reference_height: DEFAULT_REFERENCE_HEIGHT,
            parent_exit_code: DEFAULT_PARENT_EXIT_CODE,
            watch_strategy: WatchStrategy::default(),
            watcher_thread_name: DEFAULT_WATCHER_THREAD_NAME.to_string(),
        }
    }
}

impl CoreConfig {
    /// Builds a configuration from the defaults plus `HWCHECK_*` environment
    /// overrides.
    pub fn from_env() -> CoreResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides read through `lookup`, which maps an environment
    /// variable name to its value.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_REFERENCE_WIDTH) {
            self.reference_width = parse_env_value(ENV_REFERENCE_WIDTH, &value)?;
        }
        if let Some(value) = lookup(ENV_REFERENCE_HEIGHT) {
            self.reference_height = parse_env_value(ENV_REFERENCE_HEIGHT, &value)?;
        }
        if let Some(value) = lookup(ENV_PARENT_EXIT_CODE) {
            self.parent_exit_code = parse_env_value(ENV_PARENT_EXIT_CODE, &value)?;
        }
        if let Some(value) = lookup(ENV_WATCH_STRATEGY) {
            self.watch_strategy = value.parse()?;
        }
        Ok(())
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> CoreResult<()> {
        if self.reference_width <= 0 || self.reference_height <= 0 {
            return Err(CoreError::Config(format!(
                "reference resolution must be positive, got {}x{}",
                self.reference_width, self.reference_height
            )));
        }
        if !PARENT_EXIT_CODE_RANGE.contains(&self.parent_exit_code) {
            return Err(CoreError::Config(format!(
                "parent exit code must be in 1..=255, got {}",
                self.parent_exit_code
            )));
        }
        if self.watcher_thread_name.is_empty() {
            return Err(CoreError::Config(
                "watcher thread name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env_value<T: FromStr>(key: &str, value: &str) -> CoreResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CoreError::Config(format!("invalid value for {}: '{}'", key, value)))
}

