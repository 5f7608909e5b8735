//! `soilcast-config` — Soilcast runtime configuration management.
//!
//! Provides:
//! - Typed config schema (server, vision, tts, storage, logging)
//! - YAML loading with a defaults-on-missing-file fallback
//! - `${ENV_VAR}` substitution and well-known env overrides
//! - Default value application
//! - Validation with errors and warnings
//! - Config redaction for safe logging

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_file_path, load_config, parse_config};
pub use redact::redact;
pub use schema::{
    LoggingConfig, ServerConfig, SoilcastConfig, StorageConfig, TtsConfig, TtsProviderName,
    VisionConfig, VisionProviderName,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply env overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<SoilcastConfig> {
    let config = load_unchecked(path).await?;
    ensure_valid(&config)?;
    Ok(config)
}

/// Everything [`load_and_prepare`] does except validation.
///
/// Lets a binary read the logging section and install its subscriber before
/// validation messages are emitted.
pub async fn load_unchecked(path: &Path) -> Result<SoilcastConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    let raw = load_config(path).await?;

    let value = resolve_env_vars_with(&raw, &env).context("Failed to resolve env vars in config")?;
    let config: SoilcastConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, &env);
    Ok(apply_all_defaults(config))
}

/// Logs validation warnings and fails on the first report with errors.
pub fn ensure_valid(config: &SoilcastConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        bail!(
            "invalid configuration: {}",
            report
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );
    }
    Ok(())
}
