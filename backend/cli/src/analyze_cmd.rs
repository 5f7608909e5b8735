//! `soilcast analyze`: run one report through the full pipeline locally.

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use soilcast_config::SoilcastConfig;
use soilcast_core::Language;
use soilcast_gateway::{analyze_upload, GatewayState, Upload};
use tracing::info;

use crate::terminal_output::{note_warn, render_narrated, supports_color};

pub async fn run(config: &SoilcastConfig, image: &Path, language: &str, text: bool) -> Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let filename = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let state = GatewayState::from_config(config).await?;
    let language = Language::from_form(language);
    info!(file = %filename, language = %language, "Analyzing report");

    let upload = Upload {
        filename,
        content_type: None,
        bytes: Bytes::from(bytes),
    };
    let sections = analyze_upload(&state, upload, &language).await?;

    let failed = sections.iter().filter(|s| s.audio_failed).count();
    if text {
        print!("{}", render_narrated(&sections, supports_color()));
    } else {
        println!("{}", serde_json::to_string_pretty(&sections)?);
    }
    if failed > 0 {
        note_warn(&format!(
            "{failed} of {} sections have no audio; files are in {}",
            sections.len(),
            state.store.audio_dir().display()
        ));
    }
    Ok(())
}
