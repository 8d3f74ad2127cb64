//! In-memory grant collection.
//!
//! Documents live in an insertion-ordered map keyed by `_id`, so "first
//! match" is deterministic. Data is lost when the process exits.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::filter::GrantFilter;
use crate::storage::{GrantCollection, ReplaceOptions, ReplaceOutcome};
use crate::types::GrantDocument;
use crate::{GrantStoreError, GrantStoreResult};

/// In-memory [`GrantCollection`] with document-store replace semantics.
#[derive(Debug, Default)]
pub struct MemoryGrantCollection {
    documents: RwLock<IndexMap<Uuid, GrantDocument>>,
}

impl MemoryGrantCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns `true` if the collection holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl GrantCollection for MemoryGrantCollection {
    async fn find(&self, filter: &GrantFilter) -> GrantStoreResult<Vec<GrantDocument>> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    async fn replace_one(
        &self,
        filter: &GrantFilter,
        document: &GrantDocument,
        options: ReplaceOptions,
    ) -> GrantStoreResult<ReplaceOutcome> {
        let mut documents = self.documents.write().await;

        let matched = documents
            .values()
            .find(|doc| filter.matches(doc))
            .map(|doc| doc.id);

        match matched {
            Some(id) if id != document.id => Err(GrantStoreError::conflict(format!(
                "replacement would change immutable _id {id} to {}",
                document.id
            ))),
            Some(id) => {
                documents.insert(id, document.clone());
                Ok(ReplaceOutcome::replaced())
            }
            None if options.upsert => {
                if documents.contains_key(&document.id) {
                    return Err(GrantStoreError::conflict(format!(
                        "document with _id {} already exists",
                        document.id
                    )));
                }
                documents.insert(document.id, document.clone());
                Ok(ReplaceOutcome::upserted(document.id))
            }
            None => Ok(ReplaceOutcome::unmatched()),
        }
    }

    async fn delete_many(&self, filter: &GrantFilter) -> GrantStoreResult<u64> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        // retain keeps the relative order of the remaining documents
        documents.retain(|_, doc| !filter.matches(doc));
        Ok((before - documents.len()) as u64)
    }
}
