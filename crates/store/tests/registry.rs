mod support;

use std::fs;

use chrono::{TimeZone, Utc};
use support::{make_raw, setup_stores};
use usage_core::CredentialKey;
use usage_store::StoreError;

#[test]
fn register_derives_truncated_key() {
    let stores = setup_stores();
    let key = stores
        .registry
        .register("sk-aaaaaaaaaaaaaaaaaaaaXYZ", "primary account");

    assert_eq!(key.as_str(), "sk-aaaaaaaaaaaaaaaaa");
    let record = stores.registry.get(&key).expect("record");
    assert_eq!(record.name, "primary account");
    assert_eq!(record.full_credential, "sk-aaaaaaaaaaaaaaaaaaaaXYZ");
    assert!(!record.created_at.is_empty());
    assert_eq!(
        stores.registry.name_of(&key).as_deref(),
        Some("primary account")
    );
}

#[test]
fn reregistering_same_prefix_overwrites() {
    let stores = setup_stores();
    let first = stores.registry.register("sk-aaaaaaaaaaaaaaaaaaaa-one", "one");
    let second = stores.registry.register("sk-aaaaaaaaaaaaaaaaaaaa-two", "two");

    assert_eq!(first, second);
    assert_eq!(stores.registry.len(), 1);
    let record = stores.registry.get(&first).expect("record");
    assert_eq!(record.name, "two");
    assert_eq!(record.full_credential, "sk-aaaaaaaaaaaaaaaaaaaa-two");
}

#[test]
fn rename_updates_existing_and_rejects_unknown() {
    let stores = setup_stores();
    let key = stores.registry.register("sk-rename-me", "before");

    stores.registry.rename(&key, "after").expect("rename");
    assert_eq!(stores.registry.name_of(&key).as_deref(), Some("after"));

    let missing = CredentialKey::new("sk-missing");
    let err = stores.registry.rename(&missing, "x").expect_err("missing");
    assert!(matches!(err, StoreError::NotFound(key) if key == missing));
}

#[test]
fn delete_cascades_into_snapshots() {
    let stores = setup_stores();
    let key = stores.registry.register("sk-cascade-credential", "cascade");
    stores.snapshots.update(&key, make_raw(Some(300), Some(10_080)));

    stores.registry.delete(&key).expect("delete");

    assert!(stores.registry.get(&key).is_none());
    assert!(stores.snapshots.get(&key).is_none());

    let stores = stores.reopen();
    assert!(stores.registry.get(&key).is_none());
    assert!(stores.snapshots.get(&key).is_none());
}

#[test]
fn delete_without_snapshot_succeeds() {
    let stores = setup_stores();
    let key = stores.registry.register("sk-no-usage", "idle");
    stores.registry.delete(&key).expect("delete");

    let err = stores.registry.delete(&key).expect_err("second delete");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn registry_survives_reopen() {
    let stores = setup_stores();
    let key = stores
        .registry
        .register_with_expiry("sk-persisted", "kept", Some("2026-03-01T00:00:00Z"))
        .expect("register");

    let stores = stores.reopen();
    let record = stores.registry.get(&key).expect("record");
    assert_eq!(record.name, "kept");
    assert_eq!(record.expires_at.as_deref(), Some("2026-03-01T00:00:00.000Z"));
}

#[test]
fn invalid_expiry_is_rejected_without_mutation() {
    let stores = setup_stores();
    let err = stores
        .registry
        .register_with_expiry("sk-bad-expiry", "bad", Some("tomorrow-ish"))
        .expect_err("invalid");
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert!(stores.registry.is_empty());

    let key = stores.registry.register("sk-good-expiry", "good");
    let err = stores
        .registry
        .update(&key, Some("renamed"), Some(Some("tomorrow-ish")))
        .expect_err("invalid");
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert_eq!(stores.registry.name_of(&key).as_deref(), Some("good"));
}

#[test]
fn update_can_set_and_clear_expiry() {
    let stores = setup_stores();
    let key = stores.registry.register("sk-expiring", "exp");

    let record = stores
        .registry
        .update(&key, None, Some(Some("2026-01-01T02:00:00+02:00")))
        .expect("set expiry");
    assert_eq!(record.name, "exp");
    assert_eq!(record.expires_at.as_deref(), Some("2026-01-01T00:00:00.000Z"));

    let record = stores
        .registry
        .update(&key, Some("renamed"), None)
        .expect("rename only");
    assert_eq!(record.expires_at.as_deref(), Some("2026-01-01T00:00:00.000Z"));

    let record = stores
        .registry
        .update(&key, None, Some(None))
        .expect("clear expiry");
    assert_eq!(record.name, "renamed");
    assert_eq!(record.expires_at, None);
}

#[test]
fn expired_lists_only_passed_expiries() {
    let stores = setup_stores();
    let past = stores
        .registry
        .register_with_expiry("sk-past-credential", "past", Some("2025-01-01T00:00:00Z"))
        .expect("register");
    let future = stores
        .registry
        .register_with_expiry("sk-future-credential", "future", Some("2027-01-01T00:00:00Z"))
        .expect("register");
    let open_ended = stores.registry.register("sk-open-credential", "open");

    let now = Utc
        .with_ymd_and_hms(2026, 6, 1, 0, 0, 0)
        .single()
        .expect("now");
    let expired = stores.registry.expired(now);

    assert_eq!(expired.len(), 1);
    assert!(expired.contains_key(&past));
    assert!(stores.registry.is_expired(&past, now));
    assert!(!stores.registry.is_expired(&future, now));
    assert!(!stores.registry.is_expired(&open_ended, now));
    assert!(!stores.registry.is_expired(&CredentialKey::new("sk-unknown"), now));
}

#[test]
fn expiry_boundary_counts_as_expired() {
    let stores = setup_stores();
    let key = stores
        .registry
        .register_with_expiry("sk-boundary", "edge", Some("2026-01-01T00:00:00Z"))
        .expect("register");
    let at_expiry = Utc
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("now");
    assert!(stores.registry.is_expired(&key, at_expiry));
}

#[test]
fn legacy_records_are_sanitized_and_persisted() {
    let stores = setup_stores();
    fs::write(
        &stores.registry_path,
        r#"{"sk-legacy": {"name": "legacy", "full_token": "sk-legacy-credential"}}"#,
    )
    .expect("write legacy file");

    let stores = stores.reopen();
    let key = CredentialKey::new("sk-legacy");
    let record = stores.registry.get(&key).expect("record");
    assert_eq!(record.name, "legacy");
    assert!(!record.created_at.is_empty());

    let contents = fs::read_to_string(&stores.registry_path).expect("read");
    let document: serde_json::Value = serde_json::from_str(&contents).expect("json");
    assert!(document["sk-legacy"].get("created_at").is_some());
    assert!(document["sk-legacy"].get("expires_at").is_some());
}

#[test]
fn mistyped_fields_do_not_erase_the_credential() {
    let stores = setup_stores();
    fs::write(
        &stores.registry_path,
        r#"{
  "sk-legacy": {
    "name": "ops",
    "full_token": "sk-legacy-credential",
    "created_at": "2025-12-19T10:00:00.000Z",
    "expires_at": 1767225600
  },
  "sk-unnamed": {
    "name": null,
    "full_token": "sk-unnamed-credential",
    "created_at": "2025-12-19T10:00:00.000Z",
    "expires_at": null
  }
}"#,
    )
    .expect("write legacy file");

    let stores = stores.reopen();
    let legacy = stores
        .registry
        .get(&CredentialKey::new("sk-legacy"))
        .expect("legacy record");
    assert_eq!(legacy.name, "ops");
    assert_eq!(legacy.full_credential, "sk-legacy-credential");
    assert_eq!(legacy.created_at, "2025-12-19T10:00:00.000Z");
    assert_eq!(legacy.expires_at, None);

    let unnamed = stores
        .registry
        .get(&CredentialKey::new("sk-unnamed"))
        .expect("unnamed record");
    assert_eq!(unnamed.name, "");
    assert_eq!(unnamed.full_credential, "sk-unnamed-credential");

    let contents = fs::read_to_string(&stores.registry_path).expect("read");
    let document: serde_json::Value = serde_json::from_str(&contents).expect("json");
    assert_eq!(document["sk-legacy"]["full_token"], "sk-legacy-credential");
    assert_eq!(document["sk-legacy"]["expires_at"], serde_json::Value::Null);
    assert_eq!(document["sk-unnamed"]["name"], "");

    let reopened = stores.reopen();
    assert_eq!(reopened.registry.len(), 2);
}
