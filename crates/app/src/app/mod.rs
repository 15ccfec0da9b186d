use std::path::PathBuf;
use std::sync::Arc;

use usage_store::{CredentialRegistry, SnapshotStore};

use crate::error::Result;
use crate::services::AppServices;
use crate::startup::AppPaths;

/// Files backing the two stores.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub snapshots_path: PathBuf,
    pub registry_path: PathBuf,
}

/// Store handles shared by every service.
#[derive(Clone)]
pub struct Stores {
    pub snapshots: Arc<SnapshotStore>,
    pub registry: Arc<CredentialRegistry>,
}

impl Stores {
    pub fn open(config: &AppConfig) -> Self {
        let snapshots = Arc::new(SnapshotStore::open(&config.snapshots_path));
        let registry = Arc::new(CredentialRegistry::open(
            &config.registry_path,
            snapshots.clone(),
        ));
        Self {
            snapshots,
            registry,
        }
    }
}

/// Application state shared by frontend backends (HTTP server, embedding proxy).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
    stores: Stores,
}

impl AppState {
    pub fn new(snapshots_path: PathBuf, registry_path: PathBuf) -> Self {
        let config = AppConfig {
            snapshots_path,
            registry_path,
        };
        let stores = Stores::open(&config);
        let services = AppServices::new(&stores);
        Self {
            config,
            services,
            stores,
        }
    }

    pub fn from_paths(paths: &AppPaths) -> Self {
        Self::new(paths.snapshots_path.clone(), paths.registry_path.clone())
    }

    /// Writes both tables, surfacing any I/O error.
    pub fn flush(&self) -> Result<()> {
        self.stores.snapshots.flush()?;
        self.stores.registry.flush()?;
        Ok(())
    }
}
