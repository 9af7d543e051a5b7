//! Store error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing a timestamp file
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be read or written
    #[error("Store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid timestamp map
    #[error("Failed to parse store {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory map could not be serialized
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
