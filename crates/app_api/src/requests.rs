use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct RegisterTokenRequest {
    #[serde(alias = "token")]
    pub credential: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Partial update of a registered credential. An explicit `"expires_at": null` clears the
/// expiry; leaving the field out keeps it.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTokenRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub expires_at: Option<Option<String>>,
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
