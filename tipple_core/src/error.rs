//! Error types for the tipple_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tipple_core operations
///
/// Only genuinely invalid input fails. Degenerate sessions (no events, zero
/// body weight) and clock skew are absorbed by the engine and never show up
/// here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Boundary input rejected before it reached the event log
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A catalog lookup by id failed
    #[error("Unknown {table} entry: {id}")]
    UnknownCatalogEntry { table: &'static str, id: String },

    /// No stored session with the given id
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session store / active pointer error
    #[error("State error: {0}")]
    State(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
