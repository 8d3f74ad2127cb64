//! PostgreSQL document collection for grantstore.
//!
//! Grants are stored as flat JSONB documents in the fixed `tokens` table,
//! one row per document:
//!
//! ```text
//! tokens (id UUID PRIMARY KEY, resource JSONB NOT NULL)
//! ```
//!
//! `resource` holds the full [`grantstore::GrantDocument`] (`_id`, `Key`,
//! `Type`, `SubjectId`, `ClientId`, `CreationTime`, `Expiration`, `Data`);
//! `id` mirrors `_id`.
//!
//! # Example
//!
//! ```ignore
//! use grantstore::{PersistedGrantStore, TokenStoreConfig};
//!
//! let config = TokenStoreConfig::new("postgres://localhost:5432", "identity");
//! let store = grantstore_postgres::connect(&config).await?;
//! store.collection().ensure_schema().await?;
//!
//! let grants = store.get_all("alice").await?;
//! ```

pub mod collection;
pub mod pool;
pub mod sql;

use grantstore::{DocumentGrantStore, GrantStoreError, GrantStoreResult, TokenStoreConfig};

pub use collection::PgGrantCollection;
pub use pool::create_pool;

/// Grant store over the PostgreSQL collection.
pub type PostgresGrantStore = DocumentGrantStore<PgGrantCollection>;

/// Connects to the configured database and returns a ready grant store.
///
/// # Errors
///
/// Returns a configuration error for an invalid config, or a storage error if
/// the pool cannot be created.
pub async fn connect(config: &TokenStoreConfig) -> GrantStoreResult<PostgresGrantStore> {
    let collection = PgGrantCollection::connect(config).await?;
    Ok(DocumentGrantStore::new(collection))
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised by the PostgreSQL collection.
#[derive(Debug, thiserror::Error)]
pub enum PgStoreError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx_core::Error),

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write collided with an existing document.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Connection settings could not be applied.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PgStoreError {
    /// Create a `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Returns `true` if this is a database error.
    #[must_use]
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl From<PgStoreError> for GrantStoreError {
    fn from(err: PgStoreError) -> Self {
        match err {
            PgStoreError::Database(e) => GrantStoreError::storage(e.to_string()),
            PgStoreError::Serialization(e) => GrantStoreError::Serialization(e),
            PgStoreError::Conflict(message) => GrantStoreError::conflict(message),
            PgStoreError::InvalidConfig(message) => GrantStoreError::configuration(message),
        }
    }
}

/// Result type for PostgreSQL collection operations.
pub type StorageResult<T> = Result<T, PgStoreError>;
