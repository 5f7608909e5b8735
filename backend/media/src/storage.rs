//! Flat on-disk storage for uploads and narration audio.
//!
//! Two directories, no index and no cleanup: uploads are kept as
//! `<uuid>_<name>`, audio files under the names the narration step picks.

use std::path::{Path, PathBuf};

use soilcast_core::{Result, SoilcastError};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::media_server::AUDIO_ROUTE_PREFIX;

#[derive(Debug, Clone)]
pub struct MediaStore {
    upload_dir: PathBuf,
    audio_dir: PathBuf,
}

impl MediaStore {
    pub fn new(upload_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            audio_dir: audio_dir.into(),
        }
    }

    /// Creates both directories if they are missing.
    pub async fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.upload_dir, &self.audio_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                SoilcastError::Storage(format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Stores an uploaded file under a unique name and returns its path.
    pub async fn save_upload(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(original_name));
        let path = self.upload_dir.join(name);
        write_file(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Stored upload");
        Ok(path)
    }

    /// Writes a narration file and returns the URL clients fetch it from.
    pub async fn save_audio(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        if !is_safe_filename(filename) {
            return Err(SoilcastError::Storage(format!("unsafe audio filename: {filename}")));
        }
        let path = self.audio_dir.join(filename);
        write_file(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Stored audio");
        Ok(audio_url(filename))
    }
}

/// Public URL of a stored audio file.
pub fn audio_url(filename: &str) -> String {
    format!("{AUDIO_ROUTE_PREFIX}/{filename}")
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)
        .await
        .map_err(|e| SoilcastError::Storage(format!("cannot write {}: {e}", path.display())))
}

/// Reduces a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped and anything other than ASCII letters, digits,
/// `-`, `_` and `.` becomes `_`. Runs of dots collapse to one and leading
/// dots are removed, so the result is never hidden and never holds `..`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let mut cleaned = String::with_capacity(base.len());
    for c in base.chars() {
        match c {
            '.' if cleaned.ends_with('.') => {}
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') => cleaned.push(c),
            _ => cleaned.push('_'),
        }
    }
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// File name without its extension, sanitized.
pub fn file_stem(name: &str) -> String {
    let safe = sanitize_filename(name);
    match safe.rfind('.') {
        Some(dot) if dot > 0 => safe[..dot].to_string(),
        _ => safe,
    }
}

/// A name that stays inside its directory: no separators, no `..`.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains(['/', '\\'])
}
