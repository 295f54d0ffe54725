//! Config defaults: fills in every setting a partial file leaves out.

use crate::schema::SnapGradeConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable consulted when the file sets no model API key.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Apply defaults for every section. After this call the section options
/// are always `Some`, so consumers can read them without re-defaulting.
pub fn apply_all_defaults(config: SnapGradeConfig) -> SnapGradeConfig {
    let config = apply_gateway_defaults(config);
    let config = apply_model_defaults(config);
    apply_logging_defaults(config)
}

pub fn apply_gateway_defaults(mut config: SnapGradeConfig) -> SnapGradeConfig {
    let gateway = config.gateway.get_or_insert_with(Default::default);
    gateway
        .host
        .get_or_insert_with(|| DEFAULT_HOST.to_string());
    gateway.port.get_or_insert(DEFAULT_PORT);
    config
}

pub fn apply_model_defaults(mut config: SnapGradeConfig) -> SnapGradeConfig {
    let model = config.model.get_or_insert_with(Default::default);
    model
        .base_url
        .get_or_insert_with(|| DEFAULT_BASE_URL.to_string());
    model
        .model
        .get_or_insert_with(|| DEFAULT_MODEL.to_string());
    if model.api_key.as_deref().map_or(true, str::is_empty) {
        model.api_key = std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.is_empty());
    }
    config
}

pub fn apply_logging_defaults(mut config: SnapGradeConfig) -> SnapGradeConfig {
    let logging = config.logging.get_or_insert_with(Default::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}
