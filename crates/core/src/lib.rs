use std::fmt;

use serde::{Deserialize, Serialize};

mod windows;

pub use windows::{
    BucketSources, SHORT_WINDOW_MAX_MINUTES, WindowSide, classify_windows, normalize_windows,
};

/// Number of leading characters of a credential that form its key.
pub const CREDENTIAL_KEY_LEN: usize = 20;

/// Stable identifier for a credential: its first [`CREDENTIAL_KEY_LEN`] characters.
///
/// Two credentials sharing the same prefix map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialKey(String);

impl CredentialKey {
    pub fn from_credential(credential: &str) -> Self {
        let prefix = match credential.char_indices().nth(CREDENTIAL_KEY_LEN) {
            Some((index, _)) => &credential[..index],
            None => credential,
        };
        Self(prefix.to_string())
    }

    /// Wraps an already-derived key, e.g. one taken from a request path.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One upstream rate-limit window as reported on either side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowUsage {
    pub used_percent: Option<f64>,
    pub reset_after_seconds: Option<u64>,
    pub window_minutes: Option<u64>,
}

/// Usage fields lifted from response headers, before bucket assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawUsageRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_used_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_reset_after_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_window_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_used_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_reset_after_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_window_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_over_secondary_percent: Option<f64>,
    pub updated_at: String,
}

impl RawUsageRecord {
    pub fn window(&self, side: WindowSide) -> WindowUsage {
        match side {
            WindowSide::Primary => WindowUsage {
                used_percent: self.primary_used_percent,
                reset_after_seconds: self.primary_reset_after_seconds,
                window_minutes: self.primary_window_minutes,
            },
            WindowSide::Secondary => WindowUsage {
                used_percent: self.secondary_used_percent,
                reset_after_seconds: self.secondary_reset_after_seconds,
                window_minutes: self.secondary_window_minutes,
            },
        }
    }

    /// True when no usage field is set; `updated_at` is not considered.
    pub fn is_empty(&self) -> bool {
        self.primary_used_percent.is_none()
            && self.primary_reset_after_seconds.is_none()
            && self.primary_window_minutes.is_none()
            && self.secondary_used_percent.is_none()
            && self.secondary_reset_after_seconds.is_none()
            && self.secondary_window_minutes.is_none()
            && self.primary_over_secondary_percent.is_none()
    }
}

/// Raw usage plus the canonical 5h/7d fields derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSnapshot {
    #[serde(flatten)]
    pub raw: RawUsageRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex_5h_used_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex_5h_reset_after_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex_5h_window_minutes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex_7d_used_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex_7d_reset_after_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex_7d_window_minutes: Option<u64>,
}

impl NormalizedSnapshot {
    pub fn short_window(&self) -> WindowUsage {
        WindowUsage {
            used_percent: self.codex_5h_used_percent,
            reset_after_seconds: self.codex_5h_reset_after_seconds,
            window_minutes: self.codex_5h_window_minutes,
        }
    }

    pub fn long_window(&self) -> WindowUsage {
        WindowUsage {
            used_percent: self.codex_7d_used_percent,
            reset_after_seconds: self.codex_7d_reset_after_seconds,
            window_minutes: self.codex_7d_window_minutes,
        }
    }
}

/// Operator-assigned label and material for one credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialRecord {
    pub name: String,
    #[serde(rename = "full_token")]
    pub full_credential: String,
    pub created_at: String,
    pub expires_at: Option<String>,
}

/// Snapshot view joined with the registry label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSnapshot {
    #[serde(flatten)]
    pub snapshot: Option<NormalizedSnapshot>,
    pub token_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_key: Option<CredentialKey>,
}
