use serde::Serialize;
use usage_core::CredentialKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    NotFound,
}

/// `{status, data}` envelope; `data` is `null` when nothing was found.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: Status,
    pub data: Option<T>,
}

impl<T> DataResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: Status,
    pub key: CredentialKey,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            message: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: Status::NotFound,
            message: Some(message.into()),
        }
    }
}
