// ============================================================================
// hwcheck-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the hwcheck core library
//
// Capability probing never fails (absence is reported as `false`), so the
// errors here come from configuration, signature parsing and the
// parent-liveness monitor setup.

use crate::parent_watch::SetupError;
use thiserror::Error;

/// Custom error types for hwcheck
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid capability signature: {0}")]
    InvalidSignature(String),

    #[error("Parent watch setup failed: {0}")]
    ParentWatch(#[from] SetupError),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for hwcheck operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
