use usage_core::CredentialKey;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("credential {0} not found")]
    NotFound(CredentialKey),
    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
