use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "codex-usage")]
#[command(about = "Tracks Codex rate-limit usage per credential and serves it over HTTP")]
#[command(version)]
pub struct CliArgs {
    /// Override the configured port for this run only
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the configured data directory for this run only
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Mount every route under this path prefix
    #[arg(long)]
    pub api_prefix: Option<String>,

    /// Log filter, e.g. `debug` or `usage_store=trace` (defaults to RUST_LOG, then `info`)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory holding tables from older installs, copied over on first start
    #[arg(long, default_value = "data")]
    pub legacy_data_dir: PathBuf,
}
