//! Environment variable handling for config values.
//!
//! - `${VAR_NAME}` in any string value is replaced at load time. Only
//!   uppercase `[A-Z_][A-Z0-9_]*` names are matched.
//! - `$${VAR_NAME}` escapes to a literal `${VAR_NAME}`.
//! - A few well-known variables (`GEMINI_API_KEY`, ...) fill settings the
//!   file leaves empty.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{SoilcastConfig, TtsProviderName, VisionProviderName};

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute env vars using a provided map (useful for testing).
///
/// Walks the value tree; only string leaves change. A referenced variable that
/// is unset or empty is an error naming the config path.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, v) in map {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                out.insert(key.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<String> = None;
    let replaced = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    if let Some(var_name) = missing {
        bail!(MissingEnvVarError {
            var_name,
            config_path: path.to_string(),
        });
    }
    Ok(replaced.into_owned())
}

/// Fill unset settings from well-known environment variables.
///
/// - `GEMINI_API_KEY` / `OPENAI_API_KEY` supply the vision key for the
///   matching provider, and `OPENAI_API_KEY` the OpenAI TTS key.
/// - `SOILCAST_PORT` and `SOILCAST_BIND` override the server address.
pub fn apply_env_overrides(mut config: SoilcastConfig, env: &HashMap<String, String>) -> SoilcastConfig {
    let lookup = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

    if config.vision.api_key.is_none() {
        config.vision.api_key = match config.vision.provider {
            VisionProviderName::Gemini => lookup("GEMINI_API_KEY"),
            VisionProviderName::OpenAi => lookup("OPENAI_API_KEY"),
        };
    }
    if config.tts.provider == TtsProviderName::OpenAi && config.tts.api_key.is_none() {
        config.tts.api_key = lookup("OPENAI_API_KEY");
    }
    if let Some(port) = lookup("SOILCAST_PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    if let Some(bind) = lookup("SOILCAST_BIND") {
        config.server.bind_address = bind;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_var() {
        let v = json!({"vision": {"apiKey": "${GEMINI_API_KEY}"}});
        let result = resolve_env_vars_with(&v, &env(&[("GEMINI_API_KEY", "g-123")])).unwrap();
        assert_eq!(result["vision"]["apiKey"], "g-123");
    }

    #[test]
    fn error_on_missing_var_names_path() {
        let v = json!({"tts": {"apiKey": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("MISSING_VAR"));
        assert!(err.contains("tts.apiKey"));
    }

    #[test]
    fn escaped_reference_is_kept_literally() {
        let v = json!({"note": "cost $${PRICE} per ${UNIT}"});
        let result = resolve_env_vars_with(&v, &env(&[("UNIT", "quintal")])).unwrap();
        assert_eq!(result["note"], "cost ${PRICE} per quintal");
    }

    #[test]
    fn non_strings_pass_through() {
        let v = json!({"server": {"port": 8080, "tags": ["${A}"]}});
        let result = resolve_env_vars_with(&v, &env(&[("A", "x")])).unwrap();
        assert_eq!(result["server"]["port"], 8080);
        assert_eq!(result["server"]["tags"][0], "x");
    }

    #[test]
    fn env_overrides_fill_only_missing_values() {
        let mut cfg = SoilcastConfig::default();
        cfg.vision.api_key = Some("from-file".into());
        let cfg = apply_env_overrides(
            cfg,
            &env(&[("GEMINI_API_KEY", "from-env"), ("SOILCAST_PORT", "8081")]),
        );
        assert_eq!(cfg.vision.api_key.as_deref(), Some("from-file"));
        assert_eq!(cfg.server.port, 8081);
    }

    #[test]
    fn gemini_key_comes_from_env() {
        let cfg = apply_env_overrides(SoilcastConfig::default(), &env(&[("GEMINI_API_KEY", "g")]));
        assert_eq!(cfg.vision.api_key.as_deref(), Some("g"));
    }

    #[test]
    fn bad_port_is_ignored() {
        let cfg = apply_env_overrides(SoilcastConfig::default(), &env(&[("SOILCAST_PORT", "http")]));
        assert_eq!(cfg.server.port, crate::defaults::DEFAULT_PORT);
    }
}
