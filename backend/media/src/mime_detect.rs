//! MIME type detection for uploads and stored audio.

use std::path::Path;

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "heic"         => "image/heic",
        "heif"         => "image/heif",
        "bmp"          => "image/bmp",
        "tiff" | "tif" => "image/tiff",

        // Audio
        "mp3"          => "audio/mpeg",
        "wav"          => "audio/wav",
        "ogg"          => "audio/ogg",
        "opus"         => "audio/opus",
        "aac"          => "audio/aac",
        "flac"         => "audio/flac",

        // Scanned reports
        "pdf"          => "application/pdf",

        _              => "application/octet-stream",
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Uploads the vision model can read: any image, or a PDF report.
pub fn is_supported_upload(mime: &str) -> bool {
    is_image(mime) || mime == "application/pdf"
}

/// Whether a file is safe to serve inline (played in the browser rather than downloaded).
pub fn is_inline_safe(mime: &str) -> bool {
    matches!(
        mime,
        "audio/mpeg" | "audio/wav" | "audio/ogg" | "audio/opus" | "audio/aac" | "audio/flac"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg_case_insensitively() {
        assert_eq!(detect_mime_type(&PathBuf::from("REPORT.JPG")), "image/jpeg");
    }

    #[test]
    fn detects_mp3() {
        assert_eq!(detect_mime_type(&PathBuf::from("response_x_part_0.mp3")), "audio/mpeg");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("file.xyz")), "application/octet-stream");
    }

    #[test]
    fn supported_uploads() {
        assert!(is_supported_upload("image/png"));
        assert!(is_supported_upload("application/pdf"));
        assert!(!is_supported_upload("text/plain"));
        assert!(!is_supported_upload("application/octet-stream"));
    }
}
