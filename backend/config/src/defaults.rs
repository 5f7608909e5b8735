//! Config defaults: constants and model selection per provider.

use crate::schema::{SoilcastConfig, TtsProviderName, VisionProviderName};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_VISION_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TTS_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_TTS_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_AUDIO_DIR: &str = "audio";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_TTS_MODEL: &str = "tts-1";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: SoilcastConfig) -> SoilcastConfig {
    let config = apply_vision_defaults(config);
    apply_tts_defaults(config)
}

/// Pick the model for the configured vision provider if none was given.
fn apply_vision_defaults(mut config: SoilcastConfig) -> SoilcastConfig {
    if config.vision.model.is_none() {
        let model = match config.vision.provider {
            VisionProviderName::Gemini => DEFAULT_GEMINI_MODEL,
            VisionProviderName::OpenAi => DEFAULT_OPENAI_VISION_MODEL,
        };
        config.vision.model = Some(model.to_string());
    }
    config
}

/// OpenAI TTS needs a model name and reuses the vision key when it has none.
fn apply_tts_defaults(mut config: SoilcastConfig) -> SoilcastConfig {
    if config.tts.provider == TtsProviderName::OpenAi {
        if config.tts.model.is_none() {
            config.tts.model = Some(DEFAULT_OPENAI_TTS_MODEL.to_string());
        }
        if config.tts.api_key.is_none() && config.vision.provider == VisionProviderName::OpenAi {
            config.tts.api_key = config.vision.api_key.clone();
        }
    }
    config
}
