//! `POST /analyze-image/`
//!
//! Multipart form with the report under `soil_report` (or `file` / `image`)
//! and an optional `language` field.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use soilcast_core::{Language, NarratedSection, SoilcastError};
use tracing::debug;

use crate::error::ApiError;
use crate::pipeline::{self, Upload};
use crate::server::GatewayState;

/// Form field names accepted for the uploaded file.
pub const FILE_FIELDS: [&str; 3] = ["soil_report", "file", "image"];

#[derive(Debug, Default)]
struct AnalyzeForm {
    upload: Option<Upload>,
    language: Option<String>,
}

pub async fn analyze_image(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<NarratedSection>>, ApiError> {
    let multipart = multipart.map_err(|e| SoilcastError::InvalidInput(e.body_text()))?;
    let form = read_form(multipart).await?;

    let upload = form
        .upload
        .ok_or_else(|| SoilcastError::InvalidInput("No image uploaded".into()))?;
    let language = Language::from_form(form.language.as_deref().unwrap_or_default());

    let sections = pipeline::analyze_upload(&state, upload, &language).await?;
    Ok(Json(sections))
}

async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, SoilcastError> {
    let mut form = AnalyzeForm::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        if FILE_FIELDS.contains(&name.as_str()) && form.upload.is_none() {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(invalid_multipart)?;
            debug!(field = %name, filename = %filename, bytes = bytes.len(), "Received upload");
            form.upload = Some(Upload {
                filename,
                content_type,
                bytes,
            });
        } else if name == "language" {
            form.language = Some(field.text().await.map_err(invalid_multipart)?);
        }
    }
    Ok(form)
}

fn invalid_multipart(err: MultipartError) -> SoilcastError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return SoilcastError::PayloadTooLarge(err.body_text());
    }
    SoilcastError::InvalidInput(format!("unreadable form data: {}", err.body_text()))
}
