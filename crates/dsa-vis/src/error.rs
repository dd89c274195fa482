//! Error types for the visualizer.

use thiserror::Error;

/// Result type for visualizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or serving playback.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested input cannot start a run
    #[error("Invalid input: {0}")]
    Input(#[from] dsa_steps::Error),

    /// Bad configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
