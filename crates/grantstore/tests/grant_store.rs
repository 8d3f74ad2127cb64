//! Behaviour of `DocumentGrantStore` over the in-memory collection.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use grantstore::{
    DocumentGrantStore, GrantCollection, GrantDocument, GrantFilter, GrantStoreError,
    GrantStoreResult, MemoryGrantCollection, PersistedGrant, PersistedGrantStore, ReplaceOptions,
    ReplaceOutcome, grant_types,
};
use time::{Duration, OffsetDateTime};
use tracing::{Level, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn grant(key: &str, subject: &str, client: &str, grant_type: &str) -> PersistedGrant {
    PersistedGrant {
        key: key.to_string(),
        grant_type: grant_type.to_string(),
        subject_id: subject.to_string(),
        client_id: client.to_string(),
        creation_time: OffsetDateTime::now_utc(),
        expiration: None,
        data: format!(r#"{{"key":"{key}"}}"#),
    }
}

fn expiring(key: &str, expiration: OffsetDateTime) -> PersistedGrant {
    PersistedGrant {
        expiration: Some(expiration),
        ..grant(key, "alice", "google", grant_types::REFRESH_TOKEN)
    }
}

fn new_store() -> DocumentGrantStore<MemoryGrantCollection> {
    DocumentGrantStore::new(MemoryGrantCollection::new())
}

async fn sorted_keys(store: &DocumentGrantStore<MemoryGrantCollection>) -> Vec<String> {
    let mut keys: Vec<String> = store
        .collection()
        .find(&GrantFilter::all())
        .await
        .expect("find")
        .into_iter()
        .map(|d| d.key)
        .collect();
    keys.sort();
    keys
}

/// Records `(level, message)` of every event.
#[derive(Clone, Default)]
struct EventCollector {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCollector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .expect("lock poisoned")
            .push((*event.metadata().level(), visitor.0));
    }
}

/// Collection whose every call fails, standing in for an unreachable database.
struct UnreachableCollection;

#[async_trait]
impl GrantCollection for UnreachableCollection {
    async fn find(&self, _filter: &GrantFilter) -> GrantStoreResult<Vec<GrantDocument>> {
        Err(GrantStoreError::storage("connection refused"))
    }

    async fn replace_one(
        &self,
        _filter: &GrantFilter,
        _document: &GrantDocument,
        _options: ReplaceOptions,
    ) -> GrantStoreResult<ReplaceOutcome> {
        Err(GrantStoreError::storage("connection refused"))
    }

    async fn delete_many(&self, _filter: &GrantFilter) -> GrantStoreResult<u64> {
        Err(GrantStoreError::storage("connection refused"))
    }
}

// ---------------------------------------------------------------------------
// Store / Get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_new_key_creates_one_record() {
    let store = new_store();
    let g = grant("k1", "alice", "google", grant_types::AUTHORIZATION_CODE);

    store.store(&g).await.expect("store");

    assert_eq!(store.collection().len().await, 1);
    assert_eq!(store.get("k1").await.expect("get"), Some(g));
}

#[tokio::test]
async fn store_existing_key_replaces_in_place() {
    let store = new_store();
    store
        .store(&grant("k1", "alice", "google", grant_types::REFRESH_TOKEN))
        .await
        .expect("first store");
    let original_id = store.collection().find(&GrantFilter::by_key("k1")).await.expect("find")[0].id;

    let mut updated = grant("k1", "alice", "alexa", grant_types::REFRESH_TOKEN);
    updated.data = "rotated".to_string();
    updated.expiration = Some(OffsetDateTime::now_utc() + Duration::days(30));
    store.store(&updated).await.expect("second store");

    let docs = store.collection().find(&GrantFilter::by_key("k1")).await.expect("find");
    assert_eq!(docs.len(), 1, "replace must not duplicate the key");
    assert_eq!(docs[0].id, original_id, "internal id must be preserved");
    assert_eq!(store.get("k1").await.expect("get"), Some(updated));
}

#[tokio::test]
async fn storing_same_grant_twice_is_idempotent() {
    let store = new_store();
    let g = grant("k1", "alice", "google", grant_types::USER_CONSENT);

    store.store(&g).await.expect("store");
    store.store(&g).await.expect("store again");

    assert_eq!(store.collection().len().await, 1);
}

#[tokio::test]
async fn get_missing_key_returns_none_and_warns() {
    let collector = EventCollector::default();
    let events = Arc::clone(&collector.events);
    let subscriber = tracing_subscriber::registry().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let store = new_store();
    let result = store.get("does-not-exist").await.expect("a miss is not an error");
    assert_eq!(result, None);

    let recorded = events.lock().expect("lock poisoned");
    assert!(
        recorded
            .iter()
            .any(|(level, msg)| *level == Level::WARN && msg.contains("Failed to find grant")),
        "expected a warning for the miss, got: {recorded:?}"
    );
}

#[tokio::test]
async fn get_returns_expired_grants_untouched() {
    let store = new_store();
    let g = expiring("old", OffsetDateTime::now_utc() - Duration::days(1));
    store.store(&g).await.expect("store");

    let found = store.get("old").await.expect("get").expect("present");
    assert!(found.is_expired());
}

// ---------------------------------------------------------------------------
// GetAll
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_all_returns_every_grant_of_subject() {
    let store = new_store();
    store.store(&grant("a1", "alice", "google", grant_types::REFRESH_TOKEN)).await.expect("store");
    store.store(&grant("a2", "alice", "alexa", grant_types::USER_CONSENT)).await.expect("store");
    store.store(&grant("a3", "alice", "google", grant_types::AUTHORIZATION_CODE)).await.expect("store");
    store.store(&grant("b1", "bob", "google", grant_types::REFRESH_TOKEN)).await.expect("store");

    let mut keys: Vec<String> = store
        .get_all("alice")
        .await
        .expect("get_all")
        .into_iter()
        .map(|g| g.key)
        .collect();
    keys.sort();

    assert_eq!(keys, vec!["a1", "a2", "a3"]);
    assert!(store.get_all("carol").await.expect("get_all").is_empty());
}

// ---------------------------------------------------------------------------
// Remove
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_deletes_only_that_key() {
    let store = new_store();
    store.store(&grant("k1", "alice", "google", grant_types::REFRESH_TOKEN)).await.expect("store");
    store.store(&grant("k2", "alice", "google", grant_types::REFRESH_TOKEN)).await.expect("store");

    store.remove("k1").await.expect("remove");
    store.remove("never-stored").await.expect("removing a missing key succeeds");

    assert_eq!(sorted_keys(&store).await, vec!["k2"]);
}

#[tokio::test]
async fn remove_all_requires_subject_and_client() {
    let store = new_store();
    store.store(&grant("both-1", "alice", "google", grant_types::REFRESH_TOKEN)).await.expect("store");
    store.store(&grant("both-2", "alice", "google", grant_types::USER_CONSENT)).await.expect("store");
    store.store(&grant("subject-only", "alice", "alexa", grant_types::REFRESH_TOKEN)).await.expect("store");
    store.store(&grant("client-only", "bob", "google", grant_types::REFRESH_TOKEN)).await.expect("store");

    let removed = store.remove_all("alice", "google").await.expect("remove_all");

    assert_eq!(removed, 2);
    assert_eq!(sorted_keys(&store).await, vec!["client-only", "subject-only"]);
}

#[tokio::test]
async fn remove_all_of_type_keeps_other_types() {
    let store = new_store();
    store.store(&grant("rt", "alice", "google", grant_types::REFRESH_TOKEN)).await.expect("store");
    store.store(&grant("consent", "alice", "google", grant_types::USER_CONSENT)).await.expect("store");
    store.store(&grant("other-client", "alice", "alexa", grant_types::USER_CONSENT)).await.expect("store");

    let removed = store
        .remove_all_of_type("alice", "google", grant_types::USER_CONSENT)
        .await
        .expect("remove_all_of_type");

    assert_eq!(removed, 1);
    assert_eq!(sorted_keys(&store).await, vec!["other-client", "rt"]);
}

#[tokio::test]
async fn remove_all_expired_keeps_live_and_non_expiring() {
    let store = new_store();
    let now = OffsetDateTime::now_utc();
    store.store(&expiring("expired-1", now - Duration::minutes(1))).await.expect("store");
    store.store(&expiring("expired-2", now - Duration::days(10))).await.expect("store");
    store.store(&expiring("live", now + Duration::hours(1))).await.expect("store");
    store.store(&grant("forever", "alice", "google", grant_types::USER_CONSENT)).await.expect("store");

    let removed = store.remove_all_expired().await.expect("remove_all_expired");

    assert_eq!(removed, 2);
    assert_eq!(sorted_keys(&store).await, vec!["forever", "live"]);
}

#[tokio::test]
async fn remove_all_expired_at_uses_given_instant() {
    let store = new_store();
    let cutoff = time::macros::datetime!(2024-06-01 12:00 UTC);
    store.store(&expiring("before", cutoff - Duration::seconds(1))).await.expect("store");
    store.store(&expiring("at", cutoff)).await.expect("store");

    let removed = store.remove_all_expired_at(cutoff).await.expect("sweep");

    assert_eq!(removed, 1);
    assert_eq!(sorted_keys(&store).await, vec!["at"]);
}

// ---------------------------------------------------------------------------
// Faults
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collection_faults_propagate() {
    let store = DocumentGrantStore::new(UnreachableCollection);

    let err = store.get("k1").await.expect_err("a fault is not a miss");
    assert!(err.is_storage_error());

    assert!(store.store(&grant("k1", "a", "b", "c")).await.is_err());
    assert!(store.get_all("a").await.is_err());
    assert!(store.remove("k1").await.is_err());
    assert!(store.remove_all("a", "b").await.is_err());
    assert!(store.remove_all_of_type("a", "b", "c").await.is_err());
    assert!(store.remove_all_expired().await.is_err());
}

#[tokio::test]
async fn store_is_usable_as_trait_object() {
    let store: grantstore::DynGrantStore = Arc::new(new_store());
    store.store(&grant("k1", "alice", "google", grant_types::DEVICE_CODE)).await.expect("store");

    assert_eq!(store.get_all("alice").await.expect("get_all").len(), 1);
}
