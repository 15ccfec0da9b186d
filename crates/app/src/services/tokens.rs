use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use usage_core::{CredentialKey, CredentialRecord};

use crate::app::Stores;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct TokensService {
    stores: Stores,
}

impl TokensService {
    pub(super) fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub fn register(
        &self,
        credential: &str,
        name: &str,
        expires_at: Option<&str>,
    ) -> Result<CredentialKey> {
        let credential = credential.trim();
        if credential.is_empty() || credential.starts_with('#') {
            return Err(AppError::InvalidInput("invalid credential".to_string()));
        }
        let key = self
            .stores
            .registry
            .register_with_expiry(credential, name.trim(), expires_at)?;
        tracing::info!(key = %key, "registered credential");
        Ok(key)
    }

    pub fn list(&self) -> BTreeMap<CredentialKey, CredentialRecord> {
        self.stores.registry.list()
    }

    pub fn rename(&self, key: &CredentialKey, name: &str) -> Result<()> {
        Ok(self.stores.registry.rename(key, name)?)
    }

    /// `expires_at`: `None` keeps the current expiry, `Some(None)` clears it.
    pub fn update(
        &self,
        key: &CredentialKey,
        name: Option<&str>,
        expires_at: Option<Option<&str>>,
    ) -> Result<CredentialRecord> {
        Ok(self.stores.registry.update(key, name, expires_at)?)
    }

    pub fn delete(&self, key: &CredentialKey) -> Result<()> {
        self.stores.registry.delete(key)?;
        tracing::info!(key = %key, "deleted credential");
        Ok(())
    }

    pub fn expired(&self, now: DateTime<Utc>) -> BTreeMap<CredentialKey, CredentialRecord> {
        self.stores.registry.expired(now)
    }
}
