/// Vision understanding — analyze an uploaded image with a vision LLM.
///
/// The model is an opaque collaborator: image bytes and a prompt go in,
/// markdown text comes out. Providers are built once at startup and shared
/// through `Arc<dyn VisionModel>`.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use reqwest::Client;
use serde_json::Value;
use soilcast_core::{Result, SoilcastError};
use tracing::{debug, info};

/// Image (or document) handed to the model.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Returns the model's markdown answer for an image and a prompt.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Short provider name used in logs and errors.
    fn provider(&self) -> &str;

    async fn analyze(&self, image: &ImageInput, prompt: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

pub struct GeminiVision {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiVision {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn request_body(image: &ImageInput, prompt: &str) -> Value {
        serde_json::json!({
            "contents": [{ "parts": [
                { "text": prompt },
                { "inlineData": { "mimeType": image.mime_type, "data": STANDARD.encode(&image.bytes) } }
            ]}]
        })
    }
}

#[async_trait]
impl VisionModel for GeminiVision {
    fn provider(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        info!(model = %self.model, bytes = image.bytes.len(), mime = %image.mime_type, "[Vision] Analyzing image via Gemini");
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let resp = self
            .client
            .post(&url)
            // Header auth keeps the key out of URLs in error messages.
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(image, prompt))
            .send()
            .await
            .map_err(|e| SoilcastError::upstream(self.provider(), e.to_string()))?;

        let json = read_json(self.provider(), resp).await?;
        let text = extract_gemini_text(&json)
            .ok_or_else(|| SoilcastError::upstream(self.provider(), gemini_empty_reason(&json)))?;
        debug!(chars = text.len(), "[Vision] Gemini responded");
        Ok(text)
    }
}

/// Joins the text parts of the first candidate. `None` when there is no text.
pub fn extract_gemini_text(json: &Value) -> Option<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    non_blank(text)
}

fn gemini_empty_reason(json: &Value) -> String {
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        return format!("prompt blocked: {reason}");
    }
    match json["candidates"][0]["finishReason"].as_str() {
        Some(reason) => format!("empty response (finish reason {reason})"),
        None => "empty response".to_string(),
    }
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

pub struct OpenAiVision {
    api_key: String,
    model: String,
    max_tokens: u32,
    client: Client,
}

impl OpenAiVision {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gpt-4o".to_string(),
            max_tokens: 4096,
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn request_body(&self, image: &ImageInput, prompt: &str) -> Value {
        let data_url = format!("data:{};base64,{}", image.mime_type, STANDARD.encode(&image.bytes));
        serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]
            }],
            "max_tokens": self.max_tokens
        })
    }
}

#[async_trait]
impl VisionModel for OpenAiVision {
    fn provider(&self) -> &str {
        "openai"
    }

    async fn analyze(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        info!(model = %self.model, bytes = image.bytes.len(), "[Vision] Analyzing image via OpenAI");
        let resp = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&self.request_body(image, prompt))
            .send()
            .await
            .map_err(|e| SoilcastError::upstream(self.provider(), e.to_string()))?;

        let json = read_json(self.provider(), resp).await?;
        extract_openai_text(&json)
            .ok_or_else(|| SoilcastError::upstream(self.provider(), "empty response"))
    }
}

pub fn extract_openai_text(json: &Value) -> Option<String> {
    let text = json["choices"][0]["message"]["content"].as_str()?;
    non_blank(text.to_string())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn read_json(provider: &str, resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SoilcastError::upstream(provider, format!("HTTP {status}: {body}")));
    }
    resp.json()
        .await
        .map_err(|e| SoilcastError::upstream(provider, format!("unparseable response: {e}")))
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

pub enum VisionProviderKind {
    Gemini { api_key: String, model: Option<String> },
    OpenAi { api_key: String, model: Option<String> },
}

/// Builds the configured vision provider with a shared HTTP client.
pub fn create_vision(kind: VisionProviderKind, timeout: Duration) -> Result<Arc<dyn VisionModel>> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SoilcastError::Config(format!("failed to build HTTP client: {e}")))?;

    let model: Arc<dyn VisionModel> = match kind {
        VisionProviderKind::Gemini { api_key, model } => {
            let mut vision = GeminiVision::new(api_key).with_client(client);
            if let Some(model) = model {
                vision = vision.with_model(model);
            }
            Arc::new(vision)
        }
        VisionProviderKind::OpenAi { api_key, model } => {
            let mut vision = OpenAiVision::new(api_key).with_client(client);
            if let Some(model) = model {
                vision = vision.with_model(model);
            }
            Arc::new(vision)
        }
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gemini_text_parts_are_joined() {
        let resp = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "# Soil\n" },
                { "text": "pH 7.1" }
            ]}}]
        });
        assert_eq!(extract_gemini_text(&resp).unwrap(), "# Soil\npH 7.1");
    }

    #[test]
    fn gemini_blank_text_is_none() {
        let resp = json!({ "candidates": [{ "content": { "parts": [{ "text": "  \n" }] }, "finishReason": "SAFETY" }] });
        assert!(extract_gemini_text(&resp).is_none());
        assert_eq!(gemini_empty_reason(&resp), "empty response (finish reason SAFETY)");
    }

    #[test]
    fn gemini_blocked_prompt_reason() {
        let resp = json!({ "promptFeedback": { "blockReason": "OTHER" } });
        assert!(extract_gemini_text(&resp).is_none());
        assert_eq!(gemini_empty_reason(&resp), "prompt blocked: OTHER");
    }

    #[test]
    fn gemini_request_inlines_image() {
        let image = ImageInput::new(Bytes::from_static(b"abc"), "image/png");
        let body = GeminiVision::request_body(&image, "Respond in Hindi");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Respond in Hindi");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "YWJj");
    }

    #[test]
    fn openai_content_is_extracted() {
        let resp = json!({ "choices": [{ "message": { "content": "## Crops\nWheat" } }] });
        assert_eq!(extract_openai_text(&resp).unwrap(), "## Crops\nWheat");
        assert!(extract_openai_text(&json!({ "choices": [] })).is_none());
    }

    #[test]
    fn openai_request_uses_data_url() {
        let vision = OpenAiVision::new("sk-test").with_model("gpt-4o-mini");
        let image = ImageInput::new(Bytes::from_static(b"abc"), "image/jpeg");
        let body = vision.request_body(&image, "prompt");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(
            body["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,YWJj"
        );
    }
}
