//! # grantstore
//!
//! Persistence for OAuth/OIDC persisted grants (refresh tokens, authorization
//! codes, reference tokens, consents, device codes).
//!
//! The identity provider talks to a [`PersistedGrantStore`]. The provided
//! implementation, [`DocumentGrantStore`], translates each operation into
//! queries against a single [`GrantCollection`] of flat documents keyed by a
//! unique grant key. It owns no state; the collection is the source of truth.
//!
//! ## Modules
//!
//! - [`types`] - Grant record and its stored document layout
//! - [`storage`] - Exposed store trait and consumed collection trait
//! - [`filter`] - Filters over stored documents
//! - [`store`] - The document-backed store
//! - [`memory`] - In-memory collection
//! - [`config`] - Configuration loading
//! - [`observability`] - Tracing setup
//!
//! # Example
//!
//! ```ignore
//! use grantstore::{DocumentGrantStore, MemoryGrantCollection, PersistedGrantStore};
//!
//! let store = DocumentGrantStore::new(MemoryGrantCollection::new());
//! store.store(&grant).await?;
//! let found = store.get(&grant.key).await?;
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod observability;
pub mod storage;
pub mod store;
pub mod types;

pub use config::{GrantStoreSettings, TokenStoreConfig};
pub use error::{GrantStoreError, GrantStoreResult};
pub use filter::{Clause, GrantField, GrantFilter};
pub use memory::MemoryGrantCollection;
pub use storage::{GrantCollection, PersistedGrantStore, ReplaceOptions, ReplaceOutcome};
pub use store::DocumentGrantStore;
pub use types::{GrantDocument, PersistedGrant, grant_types};

/// Type alias for a shareable grant store instance.
pub type DynGrantStore = std::sync::Arc<dyn PersistedGrantStore>;
