use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use usage_core::{CredentialKey, NormalizedSnapshot, RawUsageRecord, normalize_windows};

use crate::error::Result;
use crate::table::{Entries, JsonTable, read_document};

/// Latest normalized usage per credential key.
pub struct SnapshotStore {
    table: JsonTable<NormalizedSnapshot>,
}

impl SnapshotStore {
    /// Loads the table from `path`. A missing or unreadable file starts an empty table.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_snapshots(&path);
        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded snapshots");
        Self {
            table: JsonTable::new(path, entries),
        }
    }

    /// Normalizes `raw` and replaces whatever was stored for `key`.
    pub fn update(&self, key: &CredentialKey, raw: RawUsageRecord) -> NormalizedSnapshot {
        let snapshot = normalize_windows(raw);
        let mut entries = self.table.lock();
        entries.insert(key.clone(), snapshot.clone());
        self.table.persist_locked(&entries);
        snapshot
    }

    pub fn get(&self, key: &CredentialKey) -> Option<NormalizedSnapshot> {
        self.table.lock().get(key).cloned()
    }

    pub fn get_all(&self) -> Entries<NormalizedSnapshot> {
        self.table.lock().clone()
    }

    /// Removes the snapshot for `key`. Returns `false` when nothing was stored.
    pub fn delete(&self, key: &CredentialKey) -> bool {
        let mut entries = self.table.lock();
        if entries.remove(key).is_none() {
            return false;
        }
        self.table.persist_locked(&entries);
        true
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

fn load_snapshots(path: &Path) -> Entries<NormalizedSnapshot> {
    let Some(document) = read_document(path) else {
        return Entries::new();
    };
    document
        .into_iter()
        .filter_map(|(key, value)| {
            let snapshot = load_snapshot(&key, value)?;
            Some((CredentialKey::new(key), snapshot))
        })
        .collect()
}

/// Reads one stored snapshot, dropping only the fields whose type does not match.
fn load_snapshot(key: &str, value: Value) -> Option<NormalizedSnapshot> {
    let Value::Object(fields) = value else {
        tracing::warn!(key = %key, "dropping snapshot that is not an object");
        return None;
    };
    let readable: Map<String, Value> = fields
        .into_iter()
        .filter(|(field, value)| {
            let single = Map::from_iter([(field.clone(), value.clone())]);
            let parsed = serde_json::from_value::<NormalizedSnapshot>(Value::Object(single));
            if let Err(err) = &parsed {
                tracing::warn!(
                    key = %key,
                    field = %field,
                    error = %err,
                    "dropping unreadable snapshot field"
                );
            }
            parsed.is_ok()
        })
        .collect();
    match serde_json::from_value::<NormalizedSnapshot>(Value::Object(readable)) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "dropping unreadable snapshot");
            None
        }
    }
}
