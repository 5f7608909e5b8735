//! Upload → vision model → sections → narration.

use std::path::Path;

use bytes::Bytes;
use media::{detect_mime_type, file_stem, is_supported_upload};
use soilcast_core::{Language, NarratedSection, Result, SoilcastError};
use soilcast_understanding::ImageInput;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::narration::Narration;
use crate::server::GatewayState;

/// MIME type assumed when neither the client nor the file name says.
pub const FALLBACK_MIME: &str = "image/jpeg";

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    /// The declared content type, else one guessed from the file name, else JPEG.
    pub fn mime_type(&self) -> String {
        let declared = self
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");
        if let Some(ct) = declared {
            return ct;
        }
        match detect_mime_type(Path::new(&self.filename)) {
            "application/octet-stream" => FALLBACK_MIME.to_string(),
            detected => detected.to_string(),
        }
    }
}

/// Runs the whole analysis for one upload.
#[instrument(skip(state, upload), fields(filename = %upload.filename, language = %language))]
pub async fn analyze_upload(
    state: &GatewayState,
    upload: Upload,
    language: &Language,
) -> Result<Vec<NarratedSection>> {
    if upload.bytes.is_empty() {
        return Err(SoilcastError::InvalidInput("uploaded file is empty".into()));
    }
    let mime_type = upload.mime_type();
    if !is_supported_upload(&mime_type) {
        return Err(SoilcastError::UnsupportedMedia(format!(
            "{mime_type} (expected an image or a PDF)"
        )));
    }

    if state.keep_uploads {
        state.store.save_upload(&upload.filename, &upload.bytes).await?;
    }

    let prompt = state.prompt.render(language);
    let image = ImageInput::new(upload.bytes, mime_type);
    let markdown = state.vision.analyze(&image, &prompt).await?;
    if markdown.trim().is_empty() {
        return Err(SoilcastError::upstream(state.vision.provider(), "empty response"));
    }

    let sections = markdown::sectionize(&markdown);
    info!(sections = sections.len(), provider = state.vision.provider(), "Response sectionized");

    let request_id = Uuid::new_v4().simple().to_string();
    let narration = Narration {
        tts: state.tts.clone(),
        store: state.store.clone(),
        options: state.narration,
        language_code: language.code().to_string(),
        file_prefix: format!("response_{}_{}", file_stem(&upload.filename), &request_id[..12]),
    };
    Ok(narration.run(sections).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str, content_type: Option<&str>) -> Upload {
        Upload {
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(b"data"),
        }
    }

    #[test]
    fn declared_content_type_wins() {
        assert_eq!(upload("scan.jpg", Some("image/png")).mime_type(), "image/png");
        assert_eq!(upload("scan", Some("Image/PNG; charset=binary")).mime_type(), "image/png");
    }

    #[test]
    fn falls_back_to_extension_then_jpeg() {
        assert_eq!(upload("report.pdf", None).mime_type(), "application/pdf");
        assert_eq!(
            upload("report.webp", Some("application/octet-stream")).mime_type(),
            "image/webp"
        );
        assert_eq!(upload("report", None).mime_type(), FALLBACK_MIME);
    }
}
