// Storage error types

use thiserror::Error;

/// Errors raised by the skill-graph store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error originating from the underlying SQLite database
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// An edge refers to a node that is not persisted
    #[error("edge {source_name} -> {target} refers to unknown node '{missing}'")]
    UnknownEndpoint {
        /// Edge source
        source_name: String,
        /// Edge target
        target: String,
        /// Endpoint with no node record
        missing: String,
    },

    /// The store could not be reached at all
    #[error("graph store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
