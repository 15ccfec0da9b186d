mod errors;
mod handlers;
mod state;

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::trace::TraceLayer;

pub use errors::HttpError;
pub use state::HttpState;

/// Builds the management router. `api_prefix`, when set, is mounted in front of every
/// route (`/<prefix>/codex/...`).
pub fn router(state: HttpState, api_prefix: Option<&str>) -> Router<()> {
    let api = Router::new()
        .route("/codex/usage", get(handlers::usage_list))
        .route("/codex/usage/:key", get(handlers::usage_get))
        .route(
            "/codex/tokens",
            get(handlers::tokens_list).post(handlers::tokens_register),
        )
        .route("/codex/expired_tokens", get(handlers::tokens_expired))
        .route(
            "/codex/tokens/:key",
            put(handlers::tokens_update).delete(handlers::tokens_delete),
        );

    let prefix = api_prefix
        .map(|value| value.trim_matches('/'))
        .filter(|value| !value.is_empty());
    let routes = match prefix {
        Some(prefix) => Router::new().nest(&format!("/{prefix}"), api),
        None => api,
    };

    routes
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
