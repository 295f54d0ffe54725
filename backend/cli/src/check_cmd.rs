//! `check`: offline diagnosis of the local configuration.
//!
//! Loads the config file, names every `${VAR}` reference that is not set,
//! and prints the validation report, so a failing `serve` can be explained
//! without starting the server.

use std::path::Path;

use anyhow::Result;

use snapgrade_config::{
    apply_all_defaults, collect_referenced_vars, contains_env_var_reference, load_config,
    resolve_env_vars, validate, SnapGradeConfig, API_KEY_ENV_VAR,
};

pub async fn run(config_path: &Path) -> Result<()> {
    println!("\n🔍 Checking SnapGrade configuration...\n");

    println!("Config file: {}", config_path.display());
    let raw = match load_config(config_path).await {
        Ok(config) => {
            if config_path.exists() {
                println!("  ✅ parsed");
            } else {
                println!("  ✅ not present, defaults apply");
            }
            config
        }
        Err(err) => {
            println!("  ❌ {err:#}");
            return Ok(());
        }
    };

    // Env references are reported before substitution so the missing ones
    // can be named individually.
    let value = serde_json::to_value(&raw)?;
    let mut missing = Vec::new();
    for var in collect_referenced_vars(&value) {
        match std::env::var(&var) {
            Ok(v) if !v.is_empty() => println!("  ✅ ${{{var}}} is set"),
            _ => {
                println!("  ❌ ${{{var}}} is referenced but not set");
                missing.push(var);
            }
        }
    }

    // With every reference set, run the same substitution `serve` would,
    // so the remaining checks see the final values.
    let resolved: SnapGradeConfig = if missing.is_empty() {
        serde_json::from_value(resolve_env_vars(&value)?)?
    } else {
        raw
    };

    let config = apply_all_defaults(resolved);
    let report = validate(&config);
    for warning in &report.warnings {
        println!("  🟡 {warning}");
    }
    for error in &report.errors {
        println!("  ❌ {error}");
    }

    let has_key = config
        .model
        .as_ref()
        .and_then(|m| m.api_key.as_deref())
        .map(|key| !key.is_empty() && !contains_env_var_reference(key))
        .unwrap_or(false);
    if has_key {
        println!("  ✅ model API key available");
    } else {
        println!("  ❌ no model API key (set {API_KEY_ENV_VAR} or model.apiKey)");
    }

    println!();
    if report.is_valid() && missing.is_empty() && has_key {
        println!("🟢 All checks passed. `snapgrade serve` is ready.");
    } else {
        println!("🔴 Some checks failed; fix the items above before serving.");
    }
    Ok(())
}
