use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use app_api::{RegisterTokenRequest, UpdateTokenRequest};

use crate::{errors::HttpError, state::HttpState};

pub async fn usage_get(
    State(state): State<HttpState>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    Json(app_api::usage_get(&state.context, &key))
}

pub async fn usage_list(State(state): State<HttpState>) -> impl IntoResponse {
    Json(app_api::usage_list(&state.context))
}

pub async fn tokens_register(
    State(state): State<HttpState>,
    req: Result<Json<RegisterTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = req?;
    let response = app_api::tokens_register(&state.context, req)?;
    Ok(Json(response))
}

pub async fn tokens_list(State(state): State<HttpState>) -> impl IntoResponse {
    Json(app_api::tokens_list(&state.context))
}

pub async fn tokens_expired(State(state): State<HttpState>) -> impl IntoResponse {
    Json(app_api::tokens_expired(&state.context))
}

pub async fn tokens_update(
    State(state): State<HttpState>,
    Path(key): Path<String>,
    req: Result<Json<UpdateTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = req?;
    let response = app_api::tokens_update(&state.context, &key, req)?;
    Ok(Json(response))
}

pub async fn tokens_delete(
    State(state): State<HttpState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::tokens_delete(&state.context, &key)?;
    Ok(Json(response))
}

pub async fn not_found() -> HttpError {
    HttpError::new(StatusCode::NOT_FOUND, "not found", Some("not_found".to_string()))
}
