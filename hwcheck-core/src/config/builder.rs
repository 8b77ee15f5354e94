// ============================================================================
// hwcheck-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig. Unset fields keep the defaults from
// `CoreConfig::default()`; validation stays in `CoreConfig::validate`.

use super::{CoreConfig, WatchStrategy};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use hwcheck_core::config::CoreConfigBuilder;
///
/// let config = CoreConfigBuilder::new()
///     .reference_resolution(1280, 720)
///     .watcher_thread_name("helper-watch")
///     .build();
/// assert_eq!(config.watcher_thread_name, "helper-watch");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a builder seeded with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resolution used for the encoder capability query.
    #[must_use]
    pub fn reference_resolution(mut self, width: i32, height: i32) -> Self {
        self.config.reference_width = width;
        self.config.reference_height = height;
        self
    }

    /// Sets the exit status used after the parent dies.
    #[must_use]
    pub fn parent_exit_code(mut self, code: i32) -> Self {
        self.config.parent_exit_code = code;
        self
    }

    /// Sets the parent watch strategy.
    #[must_use]
    pub fn watch_strategy(mut self, strategy: WatchStrategy) -> Self {
        self.config.watch_strategy = strategy;
        self
    }

    /// Sets the name of the watcher thread.
    #[must_use]
    pub fn watcher_thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.watcher_thread_name = name.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
