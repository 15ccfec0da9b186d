use std::path::{Path, PathBuf};

use crate::config::APP_DIR_NAME;

/// Picks the data dir: the command-line override, then the configured one, then the
/// platform data dir.
pub fn resolve_data_dir(
    override_dir: Option<PathBuf>,
    configured: Option<&str>,
) -> Result<PathBuf, String> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    if let Some(configured) = configured.map(str::trim).filter(|value| !value.is_empty()) {
        return Ok(expand_home(configured, dirs::home_dir().as_deref()));
    }
    let base = dirs::data_dir().ok_or_else(|| "resolve data dir".to_string())?;
    Ok(base.join(APP_DIR_NAME))
}

fn expand_home(value: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(value);
    };
    if value == "~" {
        return home.to_path_buf();
    }
    match value.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(value),
    }
}
