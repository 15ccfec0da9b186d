use std::path::{Path, PathBuf};

use chrono::Utc;
use usage_store::{REGISTRY_FILE_NAME, SNAPSHOTS_FILE_NAME};

use crate::{AppError, Result};

#[derive(Clone, Debug)]
pub struct AppPaths {
    pub app_data_dir: PathBuf,
    pub snapshots_path: PathBuf,
    pub registry_path: PathBuf,
}

impl AppPaths {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let snapshots_path = app_data_dir.join(SNAPSHOTS_FILE_NAME);
        let registry_path = app_data_dir.join(REGISTRY_FILE_NAME);
        Self {
            app_data_dir,
            snapshots_path,
            registry_path,
        }
    }
}

pub fn ensure_app_data_dir(paths: &AppPaths) -> Result<()> {
    std::fs::create_dir_all(&paths.app_data_dir)?;
    Ok(())
}

/// Copies tables left in a legacy `data/` directory into the app data dir.
///
/// Only runs when the app data dir has neither table yet. The legacy files are backed up
/// next to the new ones and left in place. Returns the backup dir when anything moved.
pub fn migrate_legacy_storage(paths: &AppPaths, legacy_dir: &Path) -> Result<Option<PathBuf>> {
    if paths.snapshots_path.exists() || paths.registry_path.exists() {
        return Ok(None);
    }
    if legacy_dir == paths.app_data_dir {
        return Ok(None);
    }
    let legacy_snapshots = legacy_dir.join(SNAPSHOTS_FILE_NAME);
    let legacy_registry = legacy_dir.join(REGISTRY_FILE_NAME);
    if !legacy_snapshots.exists() && !legacy_registry.exists() {
        return Ok(None);
    }
    let backup_dir = paths.app_data_dir.join(format!(
        "legacy-backup-{}",
        Utc::now().format("%Y%m%d%H%M%S")
    ));
    std::fs::create_dir_all(&backup_dir)?;
    for (legacy, target, name) in [
        (&legacy_snapshots, &paths.snapshots_path, SNAPSHOTS_FILE_NAME),
        (&legacy_registry, &paths.registry_path, REGISTRY_FILE_NAME),
    ] {
        if !legacy.exists() {
            continue;
        }
        std::fs::copy(legacy, backup_dir.join(name))
            .map_err(|err| AppError::Message(format!("backup legacy {name}: {err}")))?;
        std::fs::copy(legacy, target)
            .map_err(|err| AppError::Message(format!("migrate legacy {name}: {err}")))?;
        tracing::info!(from = %legacy.display(), to = %target.display(), "migrated legacy table");
    }
    Ok(Some(backup_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrates_legacy_tables_once() {
        let legacy = tempfile::tempdir().expect("legacy dir");
        let data = tempfile::tempdir().expect("data dir");
        std::fs::write(legacy.path().join(SNAPSHOTS_FILE_NAME), "{}").expect("write");
        let paths = AppPaths::new(data.path().to_path_buf());

        let backup = migrate_legacy_storage(&paths, legacy.path())
            .expect("migrate")
            .expect("backup dir");
        assert!(backup.join(SNAPSHOTS_FILE_NAME).exists());
        assert!(paths.snapshots_path.exists());
        assert!(!paths.registry_path.exists());

        let again = migrate_legacy_storage(&paths, legacy.path()).expect("migrate again");
        assert!(again.is_none());
    }

    #[test]
    fn skips_when_no_legacy_tables() {
        let legacy = tempfile::tempdir().expect("legacy dir");
        let data = tempfile::tempdir().expect("data dir");
        let paths = AppPaths::new(data.path().to_path_buf());
        assert!(
            migrate_legacy_storage(&paths, legacy.path())
                .expect("migrate")
                .is_none()
        );
    }
}
