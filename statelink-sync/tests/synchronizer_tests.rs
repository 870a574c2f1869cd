use statelink_storage::{MemoryStore, SnapshotStore, StoreError, StoreResult};
use statelink_sync::{MemoryNavigator, Navigator, SyncConfig, SyncError, Synchronizer};
use statelink_types::{FieldValue, Snapshot, StateObject};
use std::sync::Arc;
use std::time::Duration;

const KEY: &str = "leaderboard-filters";

fn defaults() -> StateObject {
    StateObject::new()
        .with("page", 1)
        .with("season", "current")
        .with("solo", false)
}

fn config() -> SyncConfig {
    SyncConfig::new(defaults()).url_fields(["page", "season", "solo"])
}

fn stored_config() -> SyncConfig {
    config().storage_key(KEY)
}

/// A store whose every operation fails, for degradation tests.
struct BrokenStore;

impl SnapshotStore for BrokenStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("broken".to_string()))
    }
    fn put(&self, _key: &str, _blob: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("broken".to_string()))
    }
    fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("broken".to_string()))
    }
}

// ── construction ─────────────────────────────────────────────────

#[test]
fn state_starts_at_defaults() {
    let sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    assert!(!sync.is_initialized());
    assert_eq!(sync.state(), defaults());
}

#[test]
fn unknown_url_field_is_a_construction_error() {
    let config = SyncConfig::new(defaults()).url_field("typo");
    let result = Synchronizer::new(config, MemoryNavigator::new());
    assert!(matches!(result, Err(SyncError::UnknownField(f)) if f == "typo"));
}

#[test]
fn unknown_codec_field_is_a_construction_error() {
    let config = SyncConfig::new(defaults()).codec("typo", statelink_sync::Codec::Text);
    let result = Synchronizer::new(config, MemoryNavigator::new());
    assert!(matches!(result, Err(SyncError::UnknownField(f)) if f == "typo"));
}

// ── get / set ────────────────────────────────────────────────────

#[test]
fn get_returns_current_value() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    assert_eq!(sync.get("page").unwrap(), FieldValue::Number(1.0));

    sync.set("page", 4).unwrap();
    assert_eq!(sync.get("page").unwrap(), FieldValue::Number(4.0));
}

#[test]
fn get_unknown_field_errors() {
    let sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    assert!(matches!(
        sync.get("typo"),
        Err(SyncError::UnknownField(f)) if f == "typo"
    ));
}

#[test]
fn set_rewrites_url_for_mirrored_field() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    sync.set("page", 4).unwrap();

    let nav = sync.navigator();
    assert_eq!(nav.replace_count(), 1);
    assert_eq!(nav.query().get("page"), Some("4"));
}

#[test]
fn set_of_unmirrored_field_skips_url() {
    let config = SyncConfig::new(defaults()).url_field("page");
    let mut sync = Synchronizer::new(config, MemoryNavigator::new()).unwrap();

    sync.set("season", "s2").unwrap();
    assert_eq!(sync.navigator().replace_count(), 0);
    assert_eq!(sync.get("season").unwrap(), FieldValue::from("s2"));
}

#[test]
fn set_local_never_touches_url() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    sync.set_local("page", 9).unwrap();

    assert_eq!(sync.navigator().replace_count(), 0);
    assert_eq!(sync.get("page").unwrap(), FieldValue::Number(9.0));
}

#[test]
fn set_unknown_field_errors_and_changes_nothing() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    assert!(sync.set("typo", 1).is_err());
    assert_eq!(sync.state(), defaults());
    assert_eq!(sync.navigator().replace_count(), 0);
}

#[test]
fn set_wrong_kind_errors() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    let result = sync.set("page", "not-a-number");
    assert!(matches!(result, Err(SyncError::WrongType { field, .. }) if field == "page"));
    assert_eq!(sync.get("page").unwrap(), FieldValue::Number(1.0));
}

#[test]
fn set_accepts_values_coercible_to_declared_kind() {
    let config = SyncConfig::new(StateObject::new().with("tags", serde_json::json!([])));
    let mut sync = Synchronizer::new(config, MemoryNavigator::new()).unwrap();

    // A plain string fits a JSON-declared field as a JSON string.
    sync.set("tags", "rsg").unwrap();
    assert_eq!(
        sync.get("tags").unwrap(),
        FieldValue::Json(serde_json::json!("rsg"))
    );
}

#[test]
fn empty_encoding_removes_key_from_url() {
    let mut sync = Synchronizer::new(
        config(),
        MemoryNavigator::with_query("season=current&page=2"),
    )
    .unwrap();

    sync.set("season", "").unwrap();
    let query = sync.navigator().query();
    assert!(!query.contains("season"));
}

#[test]
fn rewrite_preserves_foreign_parameters() {
    let mut sync =
        Synchronizer::new(config(), MemoryNavigator::with_query("lang=en&ref=home")).unwrap();
    sync.set("page", 2).unwrap();

    let query = sync.navigator().query();
    assert_eq!(query.get("lang"), Some("en"));
    assert_eq!(query.get("ref"), Some("home"));
    assert_eq!(query.get("page"), Some("2"));
}

// ── set_multiple ─────────────────────────────────────────────────

#[test]
fn set_multiple_applies_all_with_one_rewrite() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    sync.set_multiple(StateObject::new().with("page", 3).with("solo", true))
        .unwrap();

    assert_eq!(sync.get("page").unwrap(), FieldValue::Number(3.0));
    assert_eq!(sync.get("solo").unwrap(), FieldValue::Bool(true));
    assert_eq!(sync.navigator().replace_count(), 1);
}

#[test]
fn set_multiple_is_all_or_nothing() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    let result = sync.set_multiple(StateObject::new().with("page", 3).with("typo", 1));

    assert!(result.is_err());
    assert_eq!(sync.state(), defaults());
    assert_eq!(sync.navigator().replace_count(), 0);
}

#[test]
fn set_multiple_local_skips_url() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    sync.set_multiple_local(StateObject::new().with("page", 3))
        .unwrap();
    assert_eq!(sync.navigator().replace_count(), 0);
}

// ── subscription ─────────────────────────────────────────────────

#[test]
fn subscriber_sees_whole_batches_only() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    let mut rx = sync.subscribe();

    sync.set_multiple(StateObject::new().with("page", 3).with("solo", true))
        .unwrap();

    assert!(rx.has_changed().unwrap());
    let observed = rx.borrow_and_update().clone();
    assert_eq!(observed.get("page"), Some(&FieldValue::Number(3.0)));
    assert_eq!(observed.get("solo"), Some(&FieldValue::Bool(true)));
    // One notification for the whole batch.
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn subscriber_sees_each_set() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    let mut rx = sync.subscribe();

    sync.set("page", 2).unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(
        rx.borrow_and_update().get("page"),
        Some(&FieldValue::Number(2.0))
    );

    sync.set("page", 3).unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(
        rx.borrow_and_update().get("page"),
        Some(&FieldValue::Number(3.0))
    );
}

// ── storage ──────────────────────────────────────────────────────

#[test]
fn mirrored_set_persists_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let mut sync =
        Synchronizer::with_store(stored_config(), MemoryNavigator::new(), store.clone()).unwrap();

    sync.set("page", 5).unwrap();

    let blob = store.get(KEY).unwrap().expect("snapshot written");
    let snapshot = Snapshot::from_blob(&blob).unwrap();
    assert_eq!(snapshot.state.get("page"), Some(&FieldValue::Number(5.0)));
}

#[test]
fn set_local_does_not_persist() {
    let store = Arc::new(MemoryStore::new());
    let mut sync =
        Synchronizer::with_store(stored_config(), MemoryNavigator::new(), store.clone()).unwrap();

    sync.set_local("page", 5).unwrap();
    assert_eq!(store.get(KEY).unwrap(), None);
}

#[test]
fn save_and_restore_roundtrip() {
    let store = Arc::new(MemoryStore::new());
    let mut sync =
        Synchronizer::with_store(stored_config(), MemoryNavigator::new(), store).unwrap();

    sync.set_local("page", 7).unwrap();
    sync.try_save_to_storage().unwrap();

    let restored = sync.restore_from_storage().expect("snapshot present");
    assert_eq!(restored.get("page"), Some(&FieldValue::Number(7.0)));
}

#[test]
fn restore_without_store_is_none() {
    let sync = Synchronizer::new(stored_config(), MemoryNavigator::new()).unwrap();
    assert_eq!(sync.restore_from_storage(), None);
}

#[test]
fn restore_without_storage_key_is_none() {
    let store = Arc::new(MemoryStore::new());
    store.put(KEY, "whatever").unwrap();
    let sync = Synchronizer::with_store(config(), MemoryNavigator::new(), store).unwrap();
    assert_eq!(sync.restore_from_storage(), None);
}

#[test]
fn restore_expired_snapshot_is_none_and_removes_key() {
    let store = Arc::new(MemoryStore::new());
    let old = Snapshot::with_timestamp(defaults(), 0);
    store.put(KEY, &old.to_blob().unwrap()).unwrap();

    let config = stored_config().storage_expiry(Duration::from_millis(1000));
    let sync = Synchronizer::with_store(config, MemoryNavigator::new(), store.clone()).unwrap();

    assert_eq!(sync.restore_from_storage(), None);
    assert_eq!(store.get(KEY).unwrap(), None);
}

#[test]
fn corrupt_snapshot_is_an_error_internally_and_none_publicly() {
    let store = Arc::new(MemoryStore::new());
    store.put(KEY, "{definitely not json").unwrap();

    let sync = Synchronizer::with_store(stored_config(), MemoryNavigator::new(), store).unwrap();
    assert!(matches!(
        sync.try_restore_from_storage(),
        Err(SyncError::CorruptSnapshot(_))
    ));
    assert_eq!(sync.restore_from_storage(), None);
}

#[test]
fn restored_state_is_conformed_to_declared_fields() {
    let store = Arc::new(MemoryStore::new());
    let snapshot = Snapshot::new(
        StateObject::new()
            .with("page", 6)
            .with("stray", "x")
            .with("solo", "not-a-bool"),
    );
    store.put(KEY, &snapshot.to_blob().unwrap()).unwrap();

    let sync = Synchronizer::with_store(stored_config(), MemoryNavigator::new(), store).unwrap();
    let restored = sync.restore_from_storage().unwrap();

    assert_eq!(restored.get("page"), Some(&FieldValue::Number(6.0)));
    assert_eq!(restored.get("stray"), None);
    // Wrong-typed field fell back to its default.
    assert_eq!(restored.get("solo"), Some(&FieldValue::Bool(false)));
    assert_eq!(restored.get("season"), Some(&FieldValue::from("current")));
}

#[test]
fn broken_store_degrades_to_noop() {
    let mut sync = Synchronizer::with_store(
        stored_config(),
        MemoryNavigator::new(),
        Arc::new(BrokenStore),
    )
    .unwrap();

    // Mutations still work; the failed persist is swallowed.
    sync.set("page", 2).unwrap();
    assert_eq!(sync.get("page").unwrap(), FieldValue::Number(2.0));
    assert_eq!(sync.navigator().query().get("page"), Some("2"));

    // Reads degrade to "no persisted state", but the error stays visible
    // on the fallible variant.
    assert_eq!(sync.restore_from_storage(), None);
    assert!(matches!(
        sync.try_restore_from_storage(),
        Err(SyncError::Storage(_))
    ));
}

// ── reset ────────────────────────────────────────────────────────

#[test]
fn reset_restores_defaults_and_removes_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let mut sync =
        Synchronizer::with_store(stored_config(), MemoryNavigator::new(), store.clone()).unwrap();

    sync.set_multiple(StateObject::new().with("page", 8).with("solo", true))
        .unwrap();
    assert!(store.get(KEY).unwrap().is_some());

    sync.reset();
    assert_eq!(sync.state(), defaults());
    assert_eq!(store.get(KEY).unwrap(), None);

    // URL reflects defaults again.
    let query = sync.navigator().query();
    assert_eq!(query.get("page"), Some("1"));
    assert_eq!(query.get("solo"), Some("0"));
}

#[test]
fn reset_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let mut sync =
        Synchronizer::with_store(stored_config(), MemoryNavigator::new(), store.clone()).unwrap();

    sync.reset();
    sync.reset();
    assert_eq!(sync.state(), defaults());
    assert_eq!(store.get(KEY).unwrap(), None);
}

#[test]
fn reset_notifies_subscribers() {
    let mut sync = Synchronizer::new(config(), MemoryNavigator::new()).unwrap();
    sync.set("page", 5).unwrap();

    let mut rx = sync.subscribe();
    sync.reset();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().clone(), defaults());
}
