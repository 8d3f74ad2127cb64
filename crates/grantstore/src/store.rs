//! Grant store adapter over a document collection.

use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::GrantStoreResult;
use crate::filter::GrantFilter;
use crate::storage::{GrantCollection, PersistedGrantStore, ReplaceOptions};
use crate::types::{GrantDocument, PersistedGrant};

/// Persisted grant store backed by a [`GrantCollection`].
///
/// Holds only a handle to the collection; the collection is the sole source
/// of truth. Cloning is cheap.
///
/// `store` looks the key up and then replaces with upsert. The two steps are
/// not atomic: concurrent stores of the same key may lose an update, or fail
/// with a conflict when both generated a new id.
#[derive(Debug)]
pub struct DocumentGrantStore<C> {
    grants: Arc<C>,
}

impl<C> Clone for DocumentGrantStore<C> {
    fn clone(&self) -> Self {
        Self {
            grants: Arc::clone(&self.grants),
        }
    }
}

impl<C: GrantCollection> DocumentGrantStore<C> {
    /// Create a store over an owned collection.
    #[must_use]
    pub fn new(grants: C) -> Self {
        Self::from_arc(Arc::new(grants))
    }

    /// Create a store over a shared collection.
    #[must_use]
    pub fn from_arc(grants: Arc<C>) -> Self {
        info!("Setting up document persisted grant store");
        Self { grants }
    }

    /// Get a reference to the underlying collection.
    #[must_use]
    pub fn collection(&self) -> &C {
        &self.grants
    }

    /// Removes every grant whose expiration is before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing collection fails.
    pub async fn remove_all_expired_at(&self, now: OffsetDateTime) -> GrantStoreResult<u64> {
        let removed = self
            .grants
            .delete_many(&GrantFilter::expired_before(now))
            .await?;
        debug!(removed, "Removed expired grants");
        Ok(removed)
    }
}

#[async_trait]
impl<C: GrantCollection> PersistedGrantStore for DocumentGrantStore<C> {
    async fn store(&self, grant: &PersistedGrant) -> GrantStoreResult<()> {
        let filter = GrantFilter::by_key(&grant.key);
        let existing_id = self
            .grants
            .find(&filter)
            .await?
            .into_iter()
            .next()
            .map(|doc| doc.id);

        let document = GrantDocument::from_grant(grant, existing_id);
        self.grants
            .replace_one(&filter, &document, ReplaceOptions::upsert())
            .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> GrantStoreResult<Option<PersistedGrant>> {
        let first = self
            .grants
            .find(&GrantFilter::by_key(key))
            .await?
            .into_iter()
            .next();

        match first {
            Some(doc) => Ok(Some(doc.into_grant())),
            None => {
                warn!(key, "Failed to find grant with key");
                Ok(None)
            }
        }
    }

    async fn get_all(&self, subject_id: &str) -> GrantStoreResult<Vec<PersistedGrant>> {
        let docs = self.grants.find(&GrantFilter::by_subject(subject_id)).await?;
        Ok(docs.into_iter().map(GrantDocument::into_grant).collect())
    }

    async fn remove(&self, key: &str) -> GrantStoreResult<()> {
        self.grants.delete_many(&GrantFilter::by_key(key)).await?;
        Ok(())
    }

    async fn remove_all(&self, subject_id: &str, client_id: &str) -> GrantStoreResult<u64> {
        let removed = self
            .grants
            .delete_many(&GrantFilter::by_subject_and_client(subject_id, client_id))
            .await?;
        debug!(subject_id, client_id, removed, "Removed grants");
        Ok(removed)
    }

    async fn remove_all_of_type(
        &self,
        subject_id: &str,
        client_id: &str,
        grant_type: &str,
    ) -> GrantStoreResult<u64> {
        let filter = GrantFilter::by_subject_client_and_type(subject_id, client_id, grant_type);
        let removed = self.grants.delete_many(&filter).await?;
        debug!(subject_id, client_id, grant_type, removed, "Removed grants");
        Ok(removed)
    }

    async fn remove_all_expired(&self) -> GrantStoreResult<u64> {
        self.remove_all_expired_at(OffsetDateTime::now_utc()).await
    }
}
