//! Config file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use crate::schema::SnapGradeConfig;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the SnapGrade config directory.
/// Priority: `SNAPGRADE_CONFIG_DIR` env > `~/.snapgrade/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SNAPGRADE_CONFIG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".snapgrade")
}

/// Path of the config file inside a config directory.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config file.
///
/// A missing file is a first run, not an error: defaults apply.
pub async fn load_config(path: &Path) -> Result<SnapGradeConfig> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(SnapGradeConfig::default());
    }

    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
