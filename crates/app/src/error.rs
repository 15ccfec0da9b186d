use serde::Serialize;
use thiserror::Error;
use usage_store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Message(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => Self::NotFound(format!("credential {key} not found")),
            StoreError::InvalidInput(message) => Self::InvalidInput(message),
            other => Self::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match err {
            AppError::InvalidInput(_) => (400, Some("invalid_input".to_string())),
            AppError::NotFound(_) => (404, Some("not_found".to_string())),
            AppError::Store(_) | AppError::Io(_) | AppError::Message(_) => (500, None),
        };
        Self {
            status,
            message: err.to_string(),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_core::CredentialKey;

    #[test]
    fn store_not_found_maps_to_404() {
        let err = AppError::from(StoreError::NotFound(CredentialKey::new("sk-x")));
        let api = ApiError::from(err);
        assert_eq!(api.status, 404);
        assert_eq!(api.code.as_deref(), Some("not_found"));
        assert_eq!(api.message, "credential sk-x not found");
    }

    #[test]
    fn store_invalid_input_maps_to_400() {
        let err = AppError::from(StoreError::InvalidInput("bad expiry".to_string()));
        let api = ApiError::from(err);
        assert_eq!(api.status, 400);
        assert_eq!(api.message, "bad expiry");
    }
}
