//! Document collection trait consumed by the grant store.
//!
//! The grant store only needs three primitives from the database driver:
//! find by filter, replace one document (optionally upserting), and delete by
//! filter. Any document database client can be adapted to this trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::GrantStoreResult;
use crate::filter::GrantFilter;
use crate::types::GrantDocument;

/// Options for [`GrantCollection::replace_one`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// Insert the replacement when nothing matches.
    pub upsert: bool,
}

impl ReplaceOptions {
    /// Options with upsert enabled.
    #[must_use]
    pub fn upsert() -> Self {
        Self { upsert: true }
    }
}

/// Result of [`GrantCollection::replace_one`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Number of documents the filter matched (0 or 1).
    pub matched: u64,
    /// Number of documents that were replaced (0 or 1).
    pub modified: u64,
    /// Id of the inserted document when the replace turned into an insert.
    pub upserted_id: Option<Uuid>,
}

impl ReplaceOutcome {
    #[must_use]
    pub fn replaced() -> Self {
        Self {
            matched: 1,
            modified: 1,
            upserted_id: None,
        }
    }

    #[must_use]
    pub fn upserted(id: Uuid) -> Self {
        Self {
            matched: 0,
            modified: 0,
            upserted_id: Some(id),
        }
    }

    #[must_use]
    pub fn unmatched() -> Self {
        Self::default()
    }
}

/// A collection of grant documents.
///
/// # Implementations
///
/// - [`crate::MemoryGrantCollection`] - in-process, for tests and development
/// - `grantstore-postgres` - JSONB documents in PostgreSQL
#[async_trait]
pub trait GrantCollection: Send + Sync {
    /// Returns every document matching the filter, in collection order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn find(&self, filter: &GrantFilter) -> GrantStoreResult<Vec<GrantDocument>>;

    /// Replaces the first document matching the filter.
    ///
    /// Document ids are immutable: replacing a matched document with one that
    /// carries a different `_id` fails with a conflict. With
    /// [`ReplaceOptions::upsert`] and no match, the document is inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or violates id immutability.
    async fn replace_one(
        &self,
        filter: &GrantFilter,
        document: &GrantDocument,
        options: ReplaceOptions,
    ) -> GrantStoreResult<ReplaceOutcome>;

    /// Deletes every document matching the filter.
    ///
    /// # Returns
    ///
    /// Returns the number of documents deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    async fn delete_many(&self, filter: &GrantFilter) -> GrantStoreResult<u64>;
}
