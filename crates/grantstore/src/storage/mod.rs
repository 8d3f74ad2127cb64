//! Storage traits for persisted grants.
//!
//! - [`PersistedGrantStore`] - the contract exposed to the identity provider
//! - [`GrantCollection`] - the document store primitives the adapter consumes

pub mod collection;
pub mod grant;

pub use collection::{GrantCollection, ReplaceOptions, ReplaceOutcome};
pub use grant::PersistedGrantStore;
