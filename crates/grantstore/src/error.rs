//! Grant store error types.
//!
//! Lookup misses are not errors: [`crate::PersistedGrantStore::get`] returns
//! `None`. Everything here is a fault that propagates to the caller as-is.

/// Errors that can occur while storing or retrieving persisted grants.
#[derive(Debug, thiserror::Error)]
pub enum GrantStoreError {
    /// The backing collection failed (network, authentication, query).
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// A write collided with an existing document.
    ///
    /// Raised when a replacement would change the immutable `_id` of the
    /// document it matched.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// A stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl GrantStoreError {
    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a `Conflict` error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if this is a `Configuration` error.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns `true` if the fault came from the backing collection.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Serialization(_))
    }
}

/// Result type for grant store operations.
pub type GrantStoreResult<T> = Result<T, GrantStoreError>;
