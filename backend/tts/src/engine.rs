/// TTS provider trait and implementations (Google Translate TTS + OpenAI TTS).
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::google::GoogleTranslateTts;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Audio format for TTS output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
}

impl AudioFormat {
    /// File extension used when the audio is written to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    pub fn openai_str(&self) -> &'static str {
        self.extension()
    }
}

/// A TTS request.
#[derive(Debug, Clone)]
pub struct TtsRequest {
    pub text: String,
    /// Two-letter language code (`en`, `hi`, `pa`, ...).
    pub language: String,
}

impl TtsRequest {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }
}

impl Default for TtsRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            language: "en".to_string(),
        }
    }
}

/// Returns raw audio bytes.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes>;

    /// Format of the bytes returned by [`TtsProvider::synthesize`].
    fn output_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }
}

// ---------------------------------------------------------------------------
// OpenAI TTS
// ---------------------------------------------------------------------------

pub struct OpenAiTts {
    api_key: String,
    model: String,
    default_voice: String,
    format: AudioFormat,
    client: Client,
}

impl OpenAiTts {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "tts-1".to_string(),
            default_voice: "nova".to_string(),
            format: AudioFormat::Mp3,
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[derive(Serialize)]
struct OpenAiTtsBody {
    model: String,
    input: String,
    voice: String,
    response_format: String,
}

#[async_trait]
impl TtsProvider for OpenAiTts {
    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes> {
        // The model detects the language from the text itself.
        let body = OpenAiTtsBody {
            model: self.model.clone(),
            input: req.text,
            voice: self.default_voice.clone(),
            response_format: self.format.openai_str().to_string(),
        };
        info!(model = %body.model, lang = %req.language, "[TTS/OpenAI] Synthesizing");
        let bytes = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("OpenAI TTS request failed")?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes)
    }

    fn output_format(&self) -> AudioFormat {
        self.format
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

pub enum TtsProviderKind {
    Google,
    OpenAi {
        api_key: String,
        model: Option<String>,
        voice: Option<String>,
        format: AudioFormat,
    },
}

/// Builds the configured TTS provider. The timeout bounds each HTTP call.
pub fn create_tts(kind: TtsProviderKind, timeout: Duration) -> Result<Arc<dyn TtsProvider>> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build TTS HTTP client")?;

    let provider: Arc<dyn TtsProvider> = match kind {
        TtsProviderKind::Google => Arc::new(GoogleTranslateTts::new().with_client(client)),
        TtsProviderKind::OpenAi {
            api_key,
            model,
            voice,
            format,
        } => {
            let mut tts = OpenAiTts::new(api_key).with_format(format).with_client(client);
            if let Some(model) = model {
                tts = tts.with_model(model);
            }
            if let Some(voice) = voice {
                tts = tts.with_voice(voice);
            }
            Arc::new(tts)
        }
    };
    Ok(provider)
}
