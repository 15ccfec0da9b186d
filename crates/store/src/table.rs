use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};
use usage_core::CredentialKey;

use crate::error::Result;

pub(crate) type Entries<T> = BTreeMap<CredentialKey, T>;

/// In-memory keyed table mirrored to a single JSON document on disk.
///
/// Callers hold the lock across read-modify-persist so writers never interleave.
pub(crate) struct JsonTable<T> {
    path: PathBuf,
    entries: Mutex<Entries<T>>,
}

impl<T: Serialize> JsonTable<T> {
    pub(crate) fn new(path: PathBuf, entries: Entries<T>) -> Self {
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Entries<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes the table while the caller still holds the lock. Failures are logged and the
    /// in-memory table stays authoritative until the next successful write.
    pub(crate) fn persist_locked(&self, entries: &Entries<T>) {
        if let Err(err) = write_atomic(&self.path, entries) {
            tracing::error!(
                path = %self.path.display(),
                error = %err,
                "failed to persist table"
            );
        }
    }

    pub(crate) fn flush(&self) -> Result<()> {
        let entries = self.lock();
        write_atomic(&self.path, &*entries)
    }
}

/// Reads the persisted document as a flat JSON object.
///
/// A missing, unreadable or malformed file yields `None`.
pub(crate) fn read_document(path: &Path) -> Option<Map<String, Value>> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no persisted table, starting empty");
            return None;
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to read table, starting empty"
            );
            return None;
        }
    };
    match serde_json::from_slice::<Value>(&contents) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "table is not a JSON object, starting empty");
            None
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to parse table, starting empty"
            );
            None
        }
    }
}

pub(crate) fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_vec_pretty(value)?;
    let temp_path = temp_path_for(path);
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(&contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("table"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_sits_next_to_target() {
        let path = Path::new("/data/codex_usage.json");
        assert_eq!(
            temp_path_for(path),
            PathBuf::from("/data/codex_usage.json.tmp")
        );
    }

    #[test]
    fn write_atomic_replaces_previous_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("table.json");

        let mut first = BTreeMap::new();
        first.insert("a".to_string(), 1);
        write_atomic(&path, &first).expect("first write");

        let mut second = BTreeMap::new();
        second.insert("b".to_string(), 2);
        write_atomic(&path, &second).expect("second write");

        let document = read_document(&path).expect("document");
        assert_eq!(document.len(), 1);
        assert_eq!(document["b"], 2);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn read_document_rejects_non_objects() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("table.json");
        fs::write(&path, "[1, 2, 3]").expect("write");
        assert!(read_document(&path).is_none());
        assert!(read_document(&dir.path().join("missing.json")).is_none());
    }
}
