//! Stored document layout for persisted grants.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::grant::PersistedGrant;

/// A persisted grant as it is laid out in the collection.
///
/// Field names are fixed: `_id`, `Key`, `Type`, `SubjectId`, `ClientId`,
/// `CreationTime`, `Expiration` (null when absent) and `Data`. The `_id` only
/// satisfies the engine's primary key and never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,

    #[serde(rename = "Key")]
    pub key: String,

    #[serde(rename = "Type")]
    pub grant_type: String,

    #[serde(rename = "SubjectId")]
    pub subject_id: String,

    #[serde(rename = "ClientId")]
    pub client_id: String,

    #[serde(rename = "CreationTime", with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,

    #[serde(rename = "Expiration", default, with = "time::serde::rfc3339::option")]
    pub expiration: Option<OffsetDateTime>,

    #[serde(rename = "Data")]
    pub data: String,
}

impl GrantDocument {
    /// Builds a document for `grant`, keeping `existing_id` when the grant is
    /// already stored and generating a fresh id otherwise.
    #[must_use]
    pub fn from_grant(grant: &PersistedGrant, existing_id: Option<Uuid>) -> Self {
        Self {
            id: existing_id.unwrap_or_else(Uuid::new_v4),
            key: grant.key.clone(),
            grant_type: grant.grant_type.clone(),
            subject_id: grant.subject_id.clone(),
            client_id: grant.client_id.clone(),
            creation_time: grant.creation_time,
            expiration: grant.expiration,
            data: grant.data.clone(),
        }
    }

    /// Drops the internal id and returns the domain grant.
    #[must_use]
    pub fn into_grant(self) -> PersistedGrant {
        PersistedGrant {
            key: self.key,
            grant_type: self.grant_type,
            subject_id: self.subject_id,
            client_id: self.client_id,
            creation_time: self.creation_time,
            expiration: self.expiration,
            data: self.data,
        }
    }
}
