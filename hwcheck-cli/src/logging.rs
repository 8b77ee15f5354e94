// ============================================================================
// hwcheck-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Helper Functions for Logging
//
// The logger itself is hwcheck_core::logging (env_logger behind the `log`
// facade), installed in main.rs. RUST_LOG still applies:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug: Probe queries and watch setup details

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
