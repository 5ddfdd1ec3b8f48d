//! Daemon error types.
//!
//! Service and domain failures are handled at the API boundary; by the time
//! an error reaches the daemon itself only startup problems remain.

use thiserror::Error;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
