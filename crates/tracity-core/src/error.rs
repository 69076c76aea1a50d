//! Error types for Tracity.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested collection does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The collection exists but the predicate matched nothing.
    #[error("No data: {0}")]
    NoData(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    /// The text-generation collaborator failed or answered garbage.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A loose input fragment that could not be parsed. Callers drop the
    /// fragment and carry on.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;
