mod args;
mod config;
mod data_dir;

use std::io;
use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app_api::AppContext;
use http_api::HttpState;
use usage_app::{AppPaths, AppState, ensure_app_data_dir, migrate_legacy_storage};

use crate::args::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    init_tracing(args.log_level.as_deref());

    let config = config::load_or_create().map_err(io::Error::other)?;
    if config.created {
        tracing::info!(
            path = %config.file.display(),
            port = config.config.port,
            "created default config"
        );
    }

    let data_dir = data_dir::resolve_data_dir(args.data_dir, config.config.data_dir.as_deref())
        .map_err(io::Error::other)?;
    tracing::info!(path = %data_dir.display(), "using data dir");

    let port = args.port.unwrap_or(config.config.port);
    let api_prefix = args.api_prefix.or(config.config.api_prefix);

    let paths = AppPaths::new(data_dir);
    ensure_app_data_dir(&paths)?;
    match migrate_legacy_storage(&paths, &args.legacy_data_dir) {
        Ok(Some(backup_dir)) => {
            tracing::info!(backup = %backup_dir.display(), "migrated legacy storage");
        }
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "failed to migrate legacy storage"),
    }

    let app_state = AppState::from_paths(&paths);
    let context = AppContext::new(app_state.clone());
    let router = http_api::router(HttpState::new(context), api_prefix.as_deref());

    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    if used_fallback {
        tracing::warn!(
            configured = port,
            actual = actual_port,
            "configured port was unavailable, using a free one for this run"
        );
    }
    let url = format!("http://127.0.0.1:{actual_port}");
    tracing::info!(url = %url, "codex usage tracker is running");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(err) = app_state.flush() {
        tracing::error!(error = %err, "failed to flush tables on shutdown");
    }
    Ok(())
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
    }
}
