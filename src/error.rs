// Accelhub - Top-level error types
//
// Aggregates config, client, I/O and JSON failures into a single error enum
// for the application boundary. Accel failures never reach it; they travel
// to the caller as JSON-RPC errors.

use thiserror::Error;

/// Top-level error type for all accelhub operations.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("{0}")]
    Client(#[from] crate::gateway::ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HubError>;
