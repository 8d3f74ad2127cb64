//! Persisted grant domain type.
//!
//! A persisted grant is any OAuth/OIDC artifact the identity provider needs to
//! keep between requests: authorization codes, refresh tokens, reference
//! tokens, user consents and device flow codes. The store treats the payload
//! as opaque.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Well-known grant type names used by the identity provider.
pub mod grant_types {
    pub const AUTHORIZATION_CODE: &str = "authorization_code";
    pub const REFERENCE_TOKEN: &str = "reference_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER_CONSENT: &str = "user_consent";
    pub const DEVICE_CODE: &str = "device_code";
    pub const USER_CODE: &str = "user_code";
}

/// A grant as handed to and returned from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGrant {
    /// Unique key of the grant (usually a hash of the handle given to the client).
    pub key: String,

    /// Grant type, e.g. [`grant_types::REFRESH_TOKEN`].
    #[serde(rename = "type")]
    pub grant_type: String,

    /// Subject (end user) the grant belongs to.
    pub subject_id: String,

    /// Client the grant was issued to.
    pub client_id: String,

    /// When the grant was created.
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,

    /// When the grant expires (None = never).
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration: Option<OffsetDateTime>,

    /// Serialized grant payload.
    pub data: String,
}

impl PersistedGrant {
    /// Returns `true` if the grant has an expiration strictly before `now`.
    ///
    /// This is the same boundary `remove_all_expired` uses.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expiration.is_some_and(|exp| exp < now)
    }

    /// Returns `true` if the grant has expired as of the current UTC time.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn grant(expiration: Option<OffsetDateTime>) -> PersistedGrant {
        PersistedGrant {
            key: "k1".to_string(),
            grant_type: grant_types::REFRESH_TOKEN.to_string(),
            subject_id: "alice".to_string(),
            client_id: "google".to_string(),
            creation_time: OffsetDateTime::now_utc(),
            expiration,
            data: "{}".to_string(),
        }
    }

    #[test]
    fn test_is_expired_at() {
        let now = OffsetDateTime::now_utc();

        assert!(!grant(None).is_expired_at(now));
        assert!(!grant(Some(now + Duration::hours(1))).is_expired_at(now));
        assert!(grant(Some(now - Duration::seconds(1))).is_expired_at(now));
        // The boundary itself is not expired
        assert!(!grant(Some(now)).is_expired_at(now));
    }

    #[test]
    fn test_serialization_uses_type_field() {
        let json = serde_json::to_value(grant(None)).unwrap();
        assert_eq!(json["type"], "refresh_token");
        assert_eq!(json["subjectId"], "alice");
        assert!(json["expiration"].is_null());
    }
}
