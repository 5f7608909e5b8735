//! Config validation: field checks with user-friendly messages.

use crate::schema::{SoilcastConfig, TtsProviderName};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &SoilcastConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_vision(config, &mut report);
    validate_tts(config, &mut report);
    validate_storage(config, &mut report);
    report
}

fn validate_server(config: &SoilcastConfig, report: &mut ValidationReport) {
    if config.server.port == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    }
    if config.server.bind_address.trim().is_empty() {
        report.error("server.bindAddress", "Bind address cannot be empty");
    }
    if config.server.max_upload_bytes < 1024 {
        report.warn("server.maxUploadBytes", "Upload limit below 1 KiB rejects most images");
    }
}

fn validate_vision(config: &SoilcastConfig, report: &mut ValidationReport) {
    match config.vision.api_key.as_deref() {
        None | Some("") => report.error(
            "vision.apiKey",
            "No vision API key; set vision.apiKey or GEMINI_API_KEY/OPENAI_API_KEY",
        ),
        _ => {}
    }
    if config.vision.timeout_secs == 0 {
        report.error("vision.timeoutSecs", "Timeout must be at least one second");
    }
}

fn validate_tts(config: &SoilcastConfig, report: &mut ValidationReport) {
    if config.tts.max_concurrency == 0 {
        report.error("tts.maxConcurrency", "At least one narration must be allowed at a time");
    }
    if config.tts.timeout_secs == 0 {
        report.error("tts.timeoutSecs", "Timeout must be at least one second");
    }
    if config.tts.provider == TtsProviderName::OpenAi && config.tts.api_key.is_none() {
        report.error("tts.apiKey", "OpenAI TTS needs an API key");
    }
    if let Some(format) = &config.tts.format {
        if !matches!(format.as_str(), "mp3" | "opus" | "aac" | "flac" | "wav") {
            report.error("tts.format", format!("Unknown audio format '{format}'"));
        }
        if config.tts.provider == TtsProviderName::Google && format != "mp3" {
            report.warn("tts.format", "Google TTS always produces mp3; format is ignored");
        }
    }
}

fn validate_storage(config: &SoilcastConfig, report: &mut ValidationReport) {
    if config.storage.audio_dir.as_os_str().is_empty() {
        report.error("storage.audioDir", "Audio directory cannot be empty");
    }
    if config.storage.keep_uploads && config.storage.upload_dir.as_os_str().is_empty() {
        report.error("storage.uploadDir", "Upload directory cannot be empty");
    }
}
