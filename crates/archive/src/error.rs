use domain::ArchiveError;
use thiserror::Error;

/// Errors that can occur when interacting with the archive database.
#[derive(Debug, Error)]
pub enum ArchiveStoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ArchiveStoreError> for ArchiveError {
    fn from(err: ArchiveStoreError) -> Self {
        match err {
            ArchiveStoreError::Serialization(e) => ArchiveError::Serialization(e),
            other => ArchiveError::Backend(other.to_string()),
        }
    }
}

/// Result type for archive database operations.
pub type Result<T> = std::result::Result<T, ArchiveStoreError>;
