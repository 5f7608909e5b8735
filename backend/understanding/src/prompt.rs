//! System prompt sent alongside every uploaded image.

use std::path::Path;

use anyhow::{Context, Result};
use soilcast_core::Language;
use tracing::info;

/// Placeholder replaced with the caller's language name.
pub const LANGUAGE_PLACEHOLDER: &str = "{LANGUAGE}";

/// Built-in prompt for soil test reports.
pub const SOIL_REPORT_PROMPT: &str = r#"
You are an expert agricultural advisor for farmers in Punjab, India.
You will be given a soil test report as an input image or document.

Your tasks:
1. Carefully analyze the soil test parameters (pH, organic matter, nitrogen, phosphorus, potassium, micronutrients, etc.).
2. Based on the soil quality and conditions in Punjab, suggest the top 3 best crops suitable for cultivation.
3. For each crop:
   - Provide a detailed farming plan from planting to harvesting.
   - Include requirements for soil preparation, seed selection, fertilizers, irrigation, pest/disease management, and harvesting timeline.
   - Consider Punjab's local weather conditions and seasonal variations.
   - Add expected yield potential and possible risks.
   - If available, summarize current or recent market price trends for that crop in Punjab.
4. Present the answer in the language specified by the user (Hindi, Punjabi, or English).
5. Keep the explanation clear, structured, and practical so that a farmer can easily follow it for planning.
6. Farmers may not know technical terms, so use simple everyday words in the local language.
Use markdown headings to separate the overall assessment, each crop, and any warnings.
If information is uncertain (such as exact price trends), give an approximate explanation with reasoning instead of skipping it.
Respond in {LANGUAGE}
"#;

/// A prompt with a `{LANGUAGE}` placeholder.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(SOIL_REPORT_PROMPT)
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Reads a prompt from disk, or uses the built-in soil report prompt.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt file: {}", path.display()))?;
        if !template.contains(LANGUAGE_PLACEHOLDER) {
            tracing::warn!(path = %path.display(), "Prompt file has no {{LANGUAGE}} placeholder");
        }
        info!(path = %path.display(), "Loaded prompt template");
        Ok(Self { template })
    }

    /// Substitutes every `{LANGUAGE}` with the language name as the caller gave it.
    pub fn render(&self, language: &Language) -> String {
        self.template.replace(LANGUAGE_PLACEHOLDER, language.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_language_name() {
        let prompt = PromptTemplate::default().render(&Language::Punjabi);
        assert!(prompt.trim_end().ends_with("Respond in Punjabi"));
        assert!(!prompt.contains(LANGUAGE_PLACEHOLDER));
    }

    #[test]
    fn unknown_language_is_passed_through() {
        let prompt = PromptTemplate::new("Answer in {LANGUAGE}.").render(&Language::from_form("Marathi"));
        assert_eq!(prompt, "Answer in Marathi.");
    }

    #[tokio::test]
    async fn loads_custom_prompt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        tokio::fs::write(&path, "Describe the photo. Reply in {LANGUAGE}.").await.unwrap();
        let prompt = PromptTemplate::load(Some(&path)).await.unwrap();
        assert_eq!(prompt.render(&Language::Hindi), "Describe the photo. Reply in Hindi.");
    }

    #[tokio::test]
    async fn missing_prompt_file_is_an_error() {
        let err = PromptTemplate::load(Some(Path::new("/nonexistent/prompt.txt"))).await;
        assert!(err.is_err());
    }
}
