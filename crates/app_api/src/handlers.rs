use std::collections::BTreeMap;

use chrono::Utc;
use usage_app::{AppError, Result};
use usage_core::{CredentialKey, CredentialRecord, EnrichedSnapshot};

use crate::{
    AppContext, DataResponse, RegisterResponse, RegisterTokenRequest, Status, StatusResponse,
    UpdateTokenRequest,
};

const TOKEN_NOT_FOUND: &str = "Token not found";

pub fn usage_get(ctx: &AppContext, key: &str) -> DataResponse<EnrichedSnapshot> {
    let key = CredentialKey::new(key);
    match ctx.app_state.services.usage.snapshot(&key) {
        Some(snapshot) => DataResponse::success(snapshot),
        None => DataResponse::not_found(),
    }
}

pub fn usage_list(ctx: &AppContext) -> DataResponse<BTreeMap<CredentialKey, EnrichedSnapshot>> {
    DataResponse::success(ctx.app_state.services.usage.snapshots())
}

pub fn tokens_register(ctx: &AppContext, req: RegisterTokenRequest) -> Result<RegisterResponse> {
    let name = req.name.trim().to_string();
    let key = ctx.app_state.services.tokens.register(
        &req.credential,
        &name,
        req.expires_at.as_deref(),
    )?;
    Ok(RegisterResponse {
        status: Status::Success,
        key,
        name,
    })
}

pub fn tokens_list(ctx: &AppContext) -> DataResponse<BTreeMap<CredentialKey, CredentialRecord>> {
    DataResponse::success(ctx.app_state.services.tokens.list())
}

pub fn tokens_expired(
    ctx: &AppContext,
) -> DataResponse<BTreeMap<CredentialKey, CredentialRecord>> {
    DataResponse::success(ctx.app_state.services.tokens.expired(Utc::now()))
}

pub fn tokens_update(
    ctx: &AppContext,
    key: &str,
    req: UpdateTokenRequest,
) -> Result<StatusResponse> {
    let key = CredentialKey::new(key);
    let expires_at = req.expires_at.as_ref().map(|value| value.as_deref());
    let outcome = ctx
        .app_state
        .services
        .tokens
        .update(&key, req.name.as_deref(), expires_at);
    not_found_as_status(outcome.map(|_| ()))
}

pub fn tokens_delete(ctx: &AppContext, key: &str) -> Result<StatusResponse> {
    let key = CredentialKey::new(key);
    not_found_as_status(ctx.app_state.services.tokens.delete(&key))
}

fn not_found_as_status(outcome: Result<()>) -> Result<StatusResponse> {
    match outcome {
        Ok(()) => Ok(StatusResponse::success()),
        Err(AppError::NotFound(_)) => Ok(StatusResponse::not_found(TOKEN_NOT_FOUND)),
        Err(err) => Err(err),
    }
}
