//! Persisted grant storage trait.
//!
//! This is the contract the identity provider calls into. It mirrors the
//! host's grant persistence interface one operation per method.
//!
//! # Semantics
//!
//! - Grants are keyed uniquely by `key`; storing an existing key replaces it
//! - A lookup miss is `Ok(None)`, never an error
//! - Expired grants are still returned by reads; the host checks expiration
//! - `remove_all_expired` is invoked by the host on demand, there is no
//!   internal sweeper

use async_trait::async_trait;

use crate::GrantStoreResult;
use crate::types::PersistedGrant;

/// Storage trait for persisted grants.
///
/// # Implementations
///
/// - [`crate::DocumentGrantStore`] over any [`crate::storage::GrantCollection`]
/// - `grantstore-postgres` - PostgreSQL document collection
#[async_trait]
pub trait PersistedGrantStore: Send + Sync {
    /// Stores a grant, replacing any grant with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing collection fails.
    async fn store(&self, grant: &PersistedGrant) -> GrantStoreResult<()>;

    /// Gets the grant with the given key.
    ///
    /// # Returns
    ///
    /// Returns `Some(grant)` if found, `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing collection fails.
    async fn get(&self, key: &str) -> GrantStoreResult<Option<PersistedGrant>>;

    /// Gets every grant of a subject, across clients and types, unordered.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing collection fails.
    async fn get_all(&self, subject_id: &str) -> GrantStoreResult<Vec<PersistedGrant>>;

    /// Removes the grant with the given key.
    ///
    /// Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing collection fails.
    async fn remove(&self, key: &str) -> GrantStoreResult<()>;

    /// Removes all grants of a subject issued to a client.
    ///
    /// # Returns
    ///
    /// Returns the number of grants removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing collection fails.
    async fn remove_all(&self, subject_id: &str, client_id: &str) -> GrantStoreResult<u64>;

    /// Removes all grants of one type for a subject and client.
    ///
    /// # Returns
    ///
    /// Returns the number of grants removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing collection fails.
    async fn remove_all_of_type(
        &self,
        subject_id: &str,
        client_id: &str,
        grant_type: &str,
    ) -> GrantStoreResult<u64>;

    /// Removes every grant whose expiration is before the current UTC time.
    ///
    /// Grants without an expiration are kept.
    ///
    /// # Returns
    ///
    /// Returns the number of grants removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing collection fails.
    async fn remove_all_expired(&self) -> GrantStoreResult<u64>;
}
