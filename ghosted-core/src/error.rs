//! Error types for ghosted-core

use thiserror::Error;

/// Main error type for the ghosted-core library
///
/// Only ambient concerns (IO, persistence, configuration) surface as
/// errors. Domain-level misses (blank input, unknown history ids)
/// degrade to `Option`/no-ops instead; the engine has no fatal paths.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for ghosted-core
pub type Result<T> = std::result::Result<T, Error>;
