use serde::{Deserialize, Serialize};

/// Title given to text that appears before the first heading.
pub const OVERALL_ANALYSIS_TITLE: &str = "Overall Analysis";

/// Title given to the single section produced when a response has no headings.
pub const ANALYSIS_RESULT_TITLE: &str = "Analysis Result";

/// A titled, speakable chunk of a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A section together with the outcome of narrating it.
///
/// This is the element type of the `/analyze-image/` response array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarratedSection {
    pub title: String,
    pub text: String,
    pub audio_url: Option<String>,
    pub audio_failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_error: Option<String>,
}

impl NarratedSection {
    pub fn with_audio(section: Section, audio_url: String) -> Self {
        Self {
            title: section.title,
            text: section.content,
            audio_url: Some(audio_url),
            audio_failed: false,
            audio_error: None,
        }
    }

    pub fn without_audio(section: Section, reason: impl Into<String>) -> Self {
        Self {
            title: section.title,
            text: section.content,
            audio_url: None,
            audio_failed: true,
            audio_error: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrated_section_serializes_response_shape() {
        let ok = NarratedSection::with_audio(Section::new("Soil", "pH is 7"), "/get-audio/a.mp3".into());
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["title"], "Soil");
        assert_eq!(json["text"], "pH is 7");
        assert_eq!(json["audio_url"], "/get-audio/a.mp3");
        assert_eq!(json["audio_failed"], false);
        assert!(json.get("audio_error").is_none());
    }

    #[test]
    fn failed_narration_has_null_url_and_flag() {
        let failed = NarratedSection::without_audio(Section::new("Crops", "Wheat"), "timed out");
        let json = serde_json::to_value(&failed).unwrap();
        assert!(json["audio_url"].is_null());
        assert_eq!(json["audio_failed"], true);
        assert_eq!(json["audio_error"], "timed out");
    }
}
