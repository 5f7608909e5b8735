use thiserror::Error;

/// Top-level error type for the Soilcast service.
#[derive(Debug, Error)]
pub enum SoilcastError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("vision model error ({provider}): {message}")]
    UpstreamModel { provider: String, message: String },

    #[error("audio generation failed: {0}")]
    AudioGeneration(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SoilcastError {
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamModel {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the caller, rather than a collaborator or this service, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::UnsupportedMedia(_) | Self::PayloadTooLarge(_)
        )
    }
}

pub type Result<T, E = SoilcastError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_names_provider() {
        let err = SoilcastError::upstream("gemini", "empty response");
        assert_eq!(err.to_string(), "vision model error (gemini): empty response");
        assert!(!err.is_client_error());
    }

    #[test]
    fn input_errors_are_client_errors() {
        assert!(SoilcastError::InvalidInput("no file".into()).is_client_error());
        assert!(SoilcastError::UnsupportedMedia("text/plain".into()).is_client_error());
        assert!(SoilcastError::PayloadTooLarge("11 MiB".into()).is_client_error());
        assert!(!SoilcastError::Storage("disk full".into()).is_client_error());
    }
}
