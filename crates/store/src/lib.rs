mod error;
mod expiry;
mod registry;
mod snapshots;
mod table;

pub use error::{Result, StoreError};
pub use expiry::{normalize_expires_at, now_rfc3339, parse_utc_timestamp};
pub use registry::CredentialRegistry;
pub use snapshots::SnapshotStore;

/// File name of the persisted snapshot table inside the data directory.
pub const SNAPSHOTS_FILE_NAME: &str = "codex_usage.json";
/// File name of the persisted credential registry inside the data directory.
pub const REGISTRY_FILE_NAME: &str = "token_config.json";
