//! Config validation: catches broken settings before the server starts.

use thiserror::Error;

use crate::schema::SnapGradeConfig;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single validation finding with the config path it concerns.
#[derive(Debug, Error)]
#[error("'{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Outcome of validating a config: hard errors and advisory warnings.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.to_string(),
            message: message.into(),
        });
    }
}

/// Validate a config, normally after defaults have been applied.
pub fn validate(config: &SnapGradeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if let Some(gateway) = &config.gateway {
        if let Some(port) = gateway.port {
            if port < 1024 && port != 80 && port != 443 {
                report.warn(
                    "gateway.port",
                    format!("port {port} is privileged and may require elevated permissions"),
                );
            }
        }
        if let Some(host) = &gateway.host {
            if host.is_empty() {
                report.error("gateway.host", "host must not be empty");
            }
        }
    }

    if let Some(model) = &config.model {
        match &model.api_key {
            Some(key) if !key.is_empty() => {}
            _ => report.warn(
                "model.apiKey",
                "no API key is set; grade requests will fail until one is provided",
            ),
        }
        if let Some(name) = &model.model {
            if name.is_empty() {
                report.error("model.model", "model identifier must not be empty");
            }
        }
        if let Some(url) = &model.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                report.error("model.baseUrl", format!("'{url}' is not an http(s) URL"));
            }
        }
    }

    if let Some(logging) = &config.logging {
        if let Some(level) = &logging.level {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                report.error(
                    "logging.level",
                    format!("'{level}' is not one of {VALID_LOG_LEVELS:?}"),
                );
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{GatewayConfig, LoggingConfig, ModelConfig};

    #[test]
    fn defaulted_config_has_no_errors() {
        let config = apply_all_defaults(SnapGradeConfig::default());
        let report = validate(&config);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn missing_api_key_is_a_warning_not_an_error() {
        let config = SnapGradeConfig {
            model: Some(ModelConfig::default()),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.path == "model.apiKey"));
    }

    #[test]
    fn privileged_port_warns() {
        let config = SnapGradeConfig {
            gateway: Some(GatewayConfig {
                host: None,
                port: Some(81),
            }),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "gateway.port"));
    }

    #[test]
    fn standard_web_ports_do_not_warn() {
        for port in [80, 443, 8080] {
            let config = SnapGradeConfig {
                gateway: Some(GatewayConfig {
                    host: None,
                    port: Some(port),
                }),
                ..Default::default()
            };
            assert!(validate(&config).warnings.is_empty(), "port {port}");
        }
    }

    #[test]
    fn bad_log_level_is_an_error() {
        let config = SnapGradeConfig {
            logging: Some(LoggingConfig {
                level: Some("verbose".to_string()),
                dir: None,
            }),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|e| e.path == "logging.level"));
    }

    #[test]
    fn non_http_base_url_is_an_error() {
        let mut config = SnapGradeConfig::default();
        config.model.get_or_insert_with(Default::default).base_url =
            Some("generativelanguage.googleapis.com".to_string());
        let report = validate(&config);
        assert!(report.errors.iter().any(|e| e.path == "model.baseUrl"));
    }
}
