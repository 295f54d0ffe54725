//! Environment variable substitution for config values.
//!
//! String values may reference variables as `${VAR_NAME}`; references are
//! resolved while the parsed document is still a JSON value tree, so the
//! substitution applies uniformly at any nesting depth. `$${VAR_NAME}`
//! escapes the reference and is kept literally as `${VAR_NAME}`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static ENV_VAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var pattern")
});

/// A `${VAR}` reference whose variable is absent from the environment.
#[derive(Debug, Error)]
#[error("Environment variable '{var_name}' referenced at '{path}' is not set")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub path: String,
}

/// Resolve every `${VAR}` reference in the value tree, failing on the first
/// reference whose variable is unset so the error can name both the
/// variable and the config path that used it.
pub fn resolve_env_vars(value: &Value) -> Result<Value, MissingEnvVarError> {
    resolve_value(value, "")
}

/// Whether a string still carries an unescaped `${VAR}` reference.
pub fn contains_env_var_reference(input: &str) -> bool {
    ENV_VAR_PATTERN
        .captures_iter(input)
        .any(|caps| !caps[0].starts_with("$$"))
}

/// All distinct variable names referenced anywhere in the value tree.
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_from_value(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn resolve_value(value: &Value, path: &str) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, path)?)),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, val) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                out.insert(key.clone(), resolve_value(val, &child_path)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                out.push(resolve_value(item, &format!("{path}[{idx}]"))?);
            }
            Ok(Value::Array(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(input: &str, path: &str) -> Result<String, MissingEnvVarError> {
    let mut missing: Option<MissingEnvVarError> = None;

    let result = ENV_VAR_PATTERN.replace_all(input, |caps: &regex::Captures| {
        let name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{name}}}");
        }
        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                if missing.is_none() {
                    missing = Some(MissingEnvVarError {
                        var_name: name.to_string(),
                        path: path.to_string(),
                    });
                }
                String::new()
            }
        }
    });

    match missing {
        Some(err) => Err(err),
        None => Ok(result.into_owned()),
    }
}

fn collect_from_value(value: &Value, vars: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if !caps[0].starts_with("$$") {
                    vars.push(caps[1].to_string());
                }
            }
        }
        Value::Object(map) => {
            for val in map.values() {
                collect_from_value(val, vars);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_from_value(item, vars);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_set_variables() {
        std::env::set_var("SNAPGRADE_TEST_SUBST", "secret-key");
        let value = json!({ "model": { "apiKey": "${SNAPGRADE_TEST_SUBST}" } });
        let resolved = resolve_env_vars(&value).unwrap();
        assert_eq!(resolved["model"]["apiKey"], "secret-key");
    }

    #[test]
    fn missing_variable_names_itself_and_its_path() {
        let value = json!({ "model": { "apiKey": "${SNAPGRADE_TEST_UNSET_VAR}" } });
        let err = resolve_env_vars(&value).unwrap_err();
        assert_eq!(err.var_name, "SNAPGRADE_TEST_UNSET_VAR");
        assert_eq!(err.path, "model.apiKey");
    }

    #[test]
    fn escaped_references_stay_literal() {
        let value = json!({ "note": "$${NOT_A_REFERENCE}" });
        let resolved = resolve_env_vars(&value).unwrap();
        assert_eq!(resolved["note"], "${NOT_A_REFERENCE}");
    }

    #[test]
    fn substitutes_inside_longer_strings() {
        std::env::set_var("SNAPGRADE_TEST_HOST", "example.org");
        let value = json!({ "model": { "baseUrl": "https://${SNAPGRADE_TEST_HOST}/v1beta" } });
        let resolved = resolve_env_vars(&value).unwrap();
        assert_eq!(resolved["model"]["baseUrl"], "https://example.org/v1beta");
    }

    #[test]
    fn non_string_values_pass_through() {
        let value = json!({ "gateway": { "port": 8080, "tags": [1, 2] } });
        let resolved = resolve_env_vars(&value).unwrap();
        assert_eq!(resolved, value);
    }

    #[test]
    fn detects_unescaped_references() {
        assert!(contains_env_var_reference("${GEMINI_API_KEY}"));
        assert!(!contains_env_var_reference("$${GEMINI_API_KEY}"));
        assert!(!contains_env_var_reference("plain text"));
        assert!(!contains_env_var_reference("${not a name}"));
    }

    #[test]
    fn collects_each_referenced_variable_once() {
        let value = json!({
            "model": { "apiKey": "${GEMINI_API_KEY}" },
            "extra": ["${GEMINI_API_KEY}", "${OTHER_VAR}", "$${ESCAPED}"]
        });
        let vars = collect_referenced_vars(&value);
        assert_eq!(vars, vec!["GEMINI_API_KEY", "OTHER_VAR"]);
    }
}
