pub mod app;
pub mod error;
pub mod services;
pub mod startup;

pub use app::{AppConfig, AppState, Stores};
pub use error::{ApiError, AppError, Result};
pub use services::{AppServices, TokensService, UsageService};
pub use startup::{AppPaths, ensure_app_data_dir, migrate_legacy_storage};
