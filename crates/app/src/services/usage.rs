use std::collections::{BTreeMap, BTreeSet};

use ingest::HeaderSource;
use usage_core::{CredentialKey, EnrichedSnapshot};

use crate::app::Stores;

/// Records usage observed on upstream responses and answers the joined read views.
#[derive(Clone)]
pub struct UsageService {
    stores: Stores,
}

impl UsageService {
    pub(super) fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Called after each upstream response. Never fails: a missing credential or a
    /// response without usage headers simply records nothing.
    pub fn observe<H: HeaderSource + ?Sized>(
        &self,
        headers: &H,
        credential: Option<&str>,
    ) -> Option<CredentialKey> {
        let credential = credential
            .map(str::trim)
            .filter(|value| !value.is_empty())?;
        let raw = ingest::extract_usage_from_headers(headers)?;
        let key = CredentialKey::from_credential(credential);
        self.stores.snapshots.update(&key, raw);
        tracing::debug!(key = %key, "recorded usage snapshot");
        Some(key)
    }

    /// Snapshot for one key with its registry label. `None` when no usage was recorded,
    /// even if the key is registered.
    pub fn snapshot(&self, key: &CredentialKey) -> Option<EnrichedSnapshot> {
        let snapshot = self.stores.snapshots.get(key)?;
        let token_name = self.stores.registry.name_of(key).unwrap_or_default();
        Some(EnrichedSnapshot {
            snapshot: Some(snapshot),
            token_name,
            token_key: None,
        })
    }

    /// Every key known to either store, with usage where recorded.
    pub fn snapshots(&self) -> BTreeMap<CredentialKey, EnrichedSnapshot> {
        let mut snapshots = self.stores.snapshots.get_all();
        let records = self.stores.registry.list();
        let keys: BTreeSet<CredentialKey> =
            snapshots.keys().chain(records.keys()).cloned().collect();
        keys.into_iter()
            .map(|key| {
                let enriched = EnrichedSnapshot {
                    snapshot: snapshots.remove(&key),
                    token_name: records
                        .get(&key)
                        .map(|record| record.name.clone())
                        .unwrap_or_default(),
                    token_key: Some(key.clone()),
                };
                (key, enriched)
            })
            .collect()
    }
}
