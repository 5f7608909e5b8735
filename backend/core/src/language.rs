//! Response languages understood by the prompt and the narration step.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language requested by the caller.
///
/// The prompt always receives the name exactly as the caller sent it; only
/// the narration step needs a language code, and it falls back to English
/// for anything it does not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    English,
    Hindi,
    Punjabi,
    Other(String),
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl Language {
    /// Parse a form value. Blank input means the default (English).
    pub fn from_form(value: &str) -> Self {
        match value.trim() {
            "" | "English" => Self::English,
            "Hindi" => Self::Hindi,
            "Punjabi" => Self::Punjabi,
            other => Self::Other(other.to_string()),
        }
    }

    /// Name substituted into the `{LANGUAGE}` placeholder of the prompt.
    pub fn name(&self) -> &str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Punjabi => "Punjabi",
            Self::Other(name) => name,
        }
    }

    /// Two-letter code for speech synthesis. Unknown languages fall back to `en`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Punjabi => "pa",
            Self::Other(_) => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Self::from_form(&value)
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_languages_to_codes() {
        assert_eq!(Language::from_form("English").code(), "en");
        assert_eq!(Language::from_form("Hindi").code(), "hi");
        assert_eq!(Language::from_form("Punjabi").code(), "pa");
    }

    #[test]
    fn unknown_language_falls_back_to_english_code() {
        let lang = Language::from_form("Tamil");
        assert_eq!(lang.code(), "en");
        // The prompt still asks for the requested language.
        assert_eq!(lang.name(), "Tamil");
    }

    #[test]
    fn blank_means_english() {
        assert_eq!(Language::from_form("  "), Language::English);
    }
}
