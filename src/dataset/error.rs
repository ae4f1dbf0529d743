//! Dataset loader error types

use thiserror::Error;

/// Errors that can occur while fetching or parsing the family dataset
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading a local dataset file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be sent or the body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Fetching {path} failed with status {status}")]
    Status { path: String, status: u16 },

    /// The payload is not valid JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload is valid JSON but not a list of members
    #[error("Expected a list of members, found {0}")]
    NotAList(&'static str),
}

/// Result type alias for loader operations
pub type LoadResult<T> = Result<T, LoadError>;
