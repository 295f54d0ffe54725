//! Configuration for SnapGrade: schema, file loading, environment
//! variable substitution, defaults, and validation.

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::{
    apply_all_defaults, API_KEY_ENV_VAR, DEFAULT_BASE_URL, DEFAULT_HOST, DEFAULT_LOG_LEVEL,
    DEFAULT_MODEL, DEFAULT_PORT,
};
pub use env::{
    collect_referenced_vars, contains_env_var_reference, resolve_env_vars, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::{GatewayConfig, LoggingConfig, ModelConfig, SnapGradeConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

/// Load the config file and make it ready for use: parse, resolve `${VAR}`
/// references, apply defaults, validate.
///
/// Warnings are logged and tolerated; errors fail the load so a broken
/// config is caught before the server binds.
pub async fn load_and_prepare(path: &Path) -> Result<SnapGradeConfig> {
    let raw = io::load_config(path).await?;

    let value =
        serde_json::to_value(&raw).context("Failed to reshape config for env substitution")?;
    let value = env::resolve_env_vars(&value)?;
    let config: SnapGradeConfig = serde_json::from_value(value)
        .context("Failed to rebuild config after env substitution")?;

    let config = defaults::apply_all_defaults(config);

    let report = validation::validate(&config);
    for warning in &report.warnings {
        warn!("Config warning: {warning}");
    }
    if !report.is_valid() {
        let details: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Invalid config {}: {}", path.display(), details.join("; "));
    }

    Ok(config)
}
