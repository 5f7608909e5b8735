//! Config file location and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name, looked up in the working directory.
const CONFIG_FILE_NAME: &str = "soilcast.yaml";

/// Resolve the config file path.
/// Priority: explicit path > `SOILCAST_CONFIG` env > `./soilcast.yaml`
pub fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("SOILCAST_CONFIG") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load the raw config tree from disk.
///
/// Returns an empty object if the file doesn't exist (first run), so every
/// setting takes its default.
pub async fn load_config(path: &Path) -> Result<Value> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let value = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

/// Parse YAML text into a JSON value tree. An empty document is an empty object.
pub fn parse_config(yaml: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(yaml).context("Invalid YAML")?;
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        assert_eq!(
            config_file_path(Some(Path::new("/etc/soilcast.yaml"))),
            PathBuf::from("/etc/soilcast.yaml")
        );
    }

    #[test]
    fn empty_document_is_empty_object() {
        assert_eq!(parse_config("").unwrap(), Value::Object(Default::default()));
        assert_eq!(parse_config("# only a comment\n").unwrap(), Value::Object(Default::default()));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(parse_config("server: [unclosed").is_err());
    }

    #[tokio::test]
    async fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let value = load_config(&dir.path().join("absent.yaml")).await.unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_and_prepare_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soilcast.yaml");
        tokio::fs::write(&path, "vision:\n  apiKey: literal-key\nserver:\n  port: 7000\n")
            .await
            .unwrap();
        let cfg = crate::load_and_prepare(&path).await.unwrap();
        assert_eq!(cfg.vision.api_key.as_deref(), Some("literal-key"));
        assert_eq!(cfg.vision.model.as_deref(), Some(crate::defaults::DEFAULT_GEMINI_MODEL));
    }
}
