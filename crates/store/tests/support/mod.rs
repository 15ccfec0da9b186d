#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use usage_core::RawUsageRecord;
use usage_store::{CredentialRegistry, REGISTRY_FILE_NAME, SNAPSHOTS_FILE_NAME, SnapshotStore};

pub struct TestStores {
    pub _dir: TempDir,
    pub snapshots: Arc<SnapshotStore>,
    pub registry: CredentialRegistry,
    pub snapshots_path: PathBuf,
    pub registry_path: PathBuf,
}

impl TestStores {
    /// Reopens both stores from disk, as a restarted process would.
    pub fn reopen(self) -> TestStores {
        let snapshots = Arc::new(SnapshotStore::open(&self.snapshots_path));
        let registry = CredentialRegistry::open(&self.registry_path, snapshots.clone());
        TestStores {
            _dir: self._dir,
            snapshots,
            registry,
            snapshots_path: self.snapshots_path,
            registry_path: self.registry_path,
        }
    }
}

pub fn setup_stores() -> TestStores {
    let dir = tempfile::tempdir().expect("temp dir");
    let snapshots_path = dir.path().join(SNAPSHOTS_FILE_NAME);
    let registry_path = dir.path().join(REGISTRY_FILE_NAME);
    let snapshots = Arc::new(SnapshotStore::open(&snapshots_path));
    let registry = CredentialRegistry::open(&registry_path, snapshots.clone());
    TestStores {
        _dir: dir,
        snapshots,
        registry,
        snapshots_path,
        registry_path,
    }
}

pub fn make_raw(primary_window: Option<u64>, secondary_window: Option<u64>) -> RawUsageRecord {
    RawUsageRecord {
        primary_used_percent: Some(42.5),
        primary_reset_after_seconds: Some(1_200),
        primary_window_minutes: primary_window,
        secondary_used_percent: Some(10.0),
        secondary_reset_after_seconds: Some(86_000),
        secondary_window_minutes: secondary_window,
        primary_over_secondary_percent: None,
        updated_at: "2025-12-19T10:00:00.000Z".to_string(),
    }
}
