//! Domain and storage types for persisted grants.

pub mod document;
pub mod grant;

pub use document::GrantDocument;
pub use grant::{PersistedGrant, grant_types};
