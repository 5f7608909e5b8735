//! Soilcast runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section may be omitted;
//! missing values are filled from [`crate::defaults`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults::*;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for Soilcast.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilcastConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Vision model used to analyze uploads
    #[serde(default)]
    pub vision: VisionConfig,

    /// Speech synthesis for section narration
    #[serde(default)]
    pub tts: TtsConfig,

    /// Upload and audio directories
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Largest accepted multipart body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Vision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisionProviderName {
    #[default]
    Gemini,
    OpenAi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionConfig {
    pub provider: VisionProviderName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Prompt template with a `{LANGUAGE}` placeholder; built-in prompt if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_file: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            provider: VisionProviderName::default(),
            api_key: None,
            model: None,
            prompt_file: None,
            timeout_secs: DEFAULT_VISION_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// TTS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProviderName {
    #[default]
    Google,
    OpenAi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TtsConfig {
    pub provider: TtsProviderName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Output format for providers that let us choose (`mp3`, `opus`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Sections narrated at the same time per request.
    pub max_concurrency: usize,
    /// Upper bound for one section's synthesis.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProviderName::default(),
            api_key: None,
            model: None,
            voice: None,
            format: None,
            max_concurrency: DEFAULT_TTS_MAX_CONCURRENCY,
            timeout_secs: DEFAULT_TTS_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub audio_dir: PathBuf,
    /// Keep a copy of every uploaded image on disk.
    pub keep_uploads: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            audio_dir: PathBuf::from(DEFAULT_AUDIO_DIR),
            keep_uploads: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// JSON lines on the console instead of human-readable output.
    pub json: bool,
    /// Directory for daily-rotated NDJSON log files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
            dir: None,
        }
    }
}
