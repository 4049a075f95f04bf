//! Error types for the synoptic engine

/// Errors that can occur in the synoptic engine
#[derive(Debug, thiserror::Error)]
pub enum SynopticError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for synoptic operations
pub type Result<T> = std::result::Result<T, SynopticError>;
