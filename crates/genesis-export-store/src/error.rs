//! Error types for the store module.

use genesis_export_core::ModuleName;
use thiserror::Error;

/// Errors that can occur in collaborator backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Value serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A module was requested that no exporter is registered for.
    #[error("module {0} does not exist")]
    UnknownModule(ModuleName),

    /// A second exporter was registered under an existing name.
    #[error("module {0} is already registered")]
    DuplicateModule(ModuleName),

    /// A module's exporter failed.
    #[error("module {module} failed to export genesis: {reason}")]
    ModuleExport { module: ModuleName, reason: String },

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The backend cannot serve the request right now.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
