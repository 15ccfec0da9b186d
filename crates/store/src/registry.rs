use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use usage_core::{CredentialKey, CredentialRecord};

use crate::error::{Result, StoreError};
use crate::expiry::{normalize_expires_at, now_rfc3339, parse_utc_timestamp};
use crate::snapshots::SnapshotStore;
use crate::table::{Entries, JsonTable, read_document};

/// Operator labels for credentials, keyed like the snapshot store.
///
/// Deleting a credential also drops its snapshot.
pub struct CredentialRegistry {
    table: JsonTable<CredentialRecord>,
    snapshots: Arc<SnapshotStore>,
}

impl CredentialRegistry {
    pub fn open(path: impl Into<PathBuf>, snapshots: Arc<SnapshotStore>) -> Self {
        let path = path.into();
        let (entries, sanitized) = load_records(&path);
        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "loaded credential registry"
        );
        let table = JsonTable::new(path, entries);
        if sanitized {
            let entries = table.lock();
            table.persist_locked(&entries);
        }
        Self { table, snapshots }
    }

    pub fn register(&self, full_credential: &str, name: &str) -> CredentialKey {
        self.insert(full_credential, name, None)
    }

    /// Like [`register`](Self::register) with an optional expiry, rejected when unparsable.
    pub fn register_with_expiry(
        &self,
        full_credential: &str,
        name: &str,
        expires_at: Option<&str>,
    ) -> Result<CredentialKey> {
        let expires_at = normalize_expires_at(expires_at)?;
        Ok(self.insert(full_credential, name, expires_at))
    }

    fn insert(
        &self,
        full_credential: &str,
        name: &str,
        expires_at: Option<String>,
    ) -> CredentialKey {
        let key = CredentialKey::from_credential(full_credential);
        let record = CredentialRecord {
            name: name.to_string(),
            full_credential: full_credential.to_string(),
            created_at: now_rfc3339(),
            expires_at,
        };
        let mut entries = self.table.lock();
        if let Some(existing) = entries.get(&key)
            && !existing.full_credential.is_empty()
            && existing.full_credential != full_credential
        {
            tracing::warn!(key = %key, "credential key collision, replacing previous credential");
        }
        entries.insert(key.clone(), record);
        self.table.persist_locked(&entries);
        key
    }

    pub fn rename(&self, key: &CredentialKey, name: &str) -> Result<()> {
        self.update(key, Some(name), None).map(|_| ())
    }

    /// Updates the label and/or expiry of an existing credential.
    ///
    /// `expires_at`: `None` leaves the expiry alone, `Some(None)` clears it.
    pub fn update(
        &self,
        key: &CredentialKey,
        name: Option<&str>,
        expires_at: Option<Option<&str>>,
    ) -> Result<CredentialRecord> {
        let expires_at = match expires_at {
            Some(value) => Some(normalize_expires_at(value)?),
            None => None,
        };
        let mut entries = self.table.lock();
        let record = entries
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        if let Some(name) = name {
            record.name = name.to_string();
        }
        if let Some(expires_at) = expires_at {
            record.expires_at = expires_at;
        }
        let updated = record.clone();
        self.table.persist_locked(&entries);
        Ok(updated)
    }

    pub fn delete(&self, key: &CredentialKey) -> Result<()> {
        {
            let mut entries = self.table.lock();
            if entries.remove(key).is_none() {
                return Err(StoreError::NotFound(key.clone()));
            }
            self.table.persist_locked(&entries);
        }
        if !self.snapshots.delete(key) {
            tracing::debug!(key = %key, "deleted credential had no snapshot");
        }
        Ok(())
    }

    pub fn list(&self) -> Entries<CredentialRecord> {
        self.table.lock().clone()
    }

    pub fn get(&self, key: &CredentialKey) -> Option<CredentialRecord> {
        self.table.lock().get(key).cloned()
    }

    pub fn name_of(&self, key: &CredentialKey) -> Option<String> {
        self.table.lock().get(key).map(|record| record.name.clone())
    }

    pub fn is_expired(&self, key: &CredentialKey, now: DateTime<Utc>) -> bool {
        self.table
            .lock()
            .get(key)
            .is_some_and(|record| record_expired(record, now))
    }

    pub fn expired(&self, now: DateTime<Utc>) -> Entries<CredentialRecord> {
        self.table
            .lock()
            .iter()
            .filter(|(_, record)| record_expired(record, now))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flush(&self) -> Result<()> {
        self.table.flush()
    }
}

fn record_expired(record: &CredentialRecord, now: DateTime<Utc>) -> bool {
    record
        .expires_at
        .as_deref()
        .and_then(parse_utc_timestamp)
        .is_some_and(|expires_at| now >= expires_at)
}

fn load_records(path: &Path) -> (Entries<CredentialRecord>, bool) {
    let Some(document) = read_document(path) else {
        return (Entries::new(), false);
    };
    let mut sanitized = false;
    let entries = document
        .into_iter()
        .map(|(key, value)| {
            let (record, changed) = sanitize_record(&key, value);
            sanitized |= changed;
            (CredentialKey::new(key), record)
        })
        .collect();
    (entries, sanitized)
}

/// Repairs one stored record field by field. Missing or mistyped fields fall back to
/// defaults, an unparsable expiry is dropped, and every other field is kept.
fn sanitize_record(key: &str, value: Value) -> (CredentialRecord, bool) {
    let Value::Object(fields) = value else {
        tracing::warn!(key = %key, "resetting credential record that is not an object");
        let record = CredentialRecord {
            created_at: now_rfc3339(),
            ..CredentialRecord::default()
        };
        return (record, true);
    };
    let mut changed = false;
    let mut text_field = |name: &str| match fields.get(name).and_then(Value::as_str) {
        Some(value) => Some(value.to_string()),
        None => {
            changed = true;
            None
        }
    };
    let name = text_field("name").unwrap_or_default();
    let full_credential = text_field("full_token").unwrap_or_default();
    let created_at = text_field("created_at").unwrap_or_default();
    let created_at = if created_at.is_empty() {
        changed = true;
        now_rfc3339()
    } else {
        created_at
    };

    let stored_expiry = fields.get("expires_at");
    let expires_at = stored_expiry
        .and_then(Value::as_str)
        .and_then(|value| normalize_expires_at(Some(value)).ok().flatten());
    match stored_expiry {
        Some(Value::String(stored)) if expires_at.as_deref() == Some(stored.as_str()) => {}
        Some(Value::Null) if expires_at.is_none() => {}
        _ => changed = true,
    }

    let record = CredentialRecord {
        name,
        full_credential,
        created_at,
        expires_at,
    };
    (record, changed)
}
