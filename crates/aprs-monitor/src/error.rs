//! Error types for the monitor

use thiserror::Error;

/// Errors that can occur while running the monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    /// I/O error on the KISS connection or config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be used
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
