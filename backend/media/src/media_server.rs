//! Audio server: serves narration files over HTTP.
//!
//! Provides a simple Axum router that streams stored audio by file name,
//! with content-type headers derived from the extension.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::{path::PathBuf, sync::Arc};
use tokio::fs;
use tracing::{debug, warn};

use crate::mime_detect::{detect_mime_type, is_inline_safe};
use crate::storage::is_safe_filename;

/// Path prefix the audio router is mounted under.
pub const AUDIO_ROUTE_PREFIX: &str = "/get-audio";

/// State shared by audio routes.
#[derive(Clone)]
pub struct AudioServerState {
    pub audio_dir: Arc<PathBuf>,
}

/// Build the audio server Axum router.
///
/// Mount at [`AUDIO_ROUTE_PREFIX`]:
///   GET /get-audio/:filename  — serve an audio file
pub fn audio_router<S>(audio_dir: PathBuf) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let state = AudioServerState {
        audio_dir: Arc::new(audio_dir),
    };
    Router::new()
        .route("/:filename", get(serve_audio))
        .with_state(state)
}

/// GET /:filename — read an audio file from the local store.
async fn serve_audio(
    Path(filename): Path<String>,
    State(state): State<AudioServerState>,
) -> Response {
    if !is_safe_filename(&filename) {
        warn!(filename = %filename, "Rejected suspicious audio path");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    let path = state.audio_dir.join(&filename);
    debug!(path = %path.display(), "Serving audio file");

    match fs::read(&path).await {
        Ok(bytes) => {
            let mime = detect_mime_type(&path);
            let disposition = if is_inline_safe(mime) {
                format!("inline; filename=\"{filename}\"")
            } else {
                format!("attachment; filename=\"{filename}\"")
            };

            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
            if let Ok(value) = HeaderValue::from_str(&disposition) {
                headers.insert(header::CONTENT_DISPOSITION, value);
            }
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=86400"),
            );

            (StatusCode::OK, headers, bytes).into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Audio file not found").into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read audio file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read audio").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(dir: &std::path::Path) -> Router {
        Router::new().nest(AUDIO_ROUTE_PREFIX, audio_router(dir.to_path_buf()))
    }

    #[tokio::test]
    async fn serves_existing_audio_with_mime() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("response_r_part_0.mp3"), b"ID3data").await.unwrap();

        let resp = app(dir.path())
            .oneshot(Request::get("/get-audio/response_r_part_0.mp3").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "audio/mpeg");
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ID3data");
    }

    #[tokio::test]
    async fn missing_audio_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(dir.path())
            .oneshot(Request::get("/get-audio/nope.mp3").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(dir.path())
            .oneshot(Request::get("/get-audio/..%2Fsecret.mp3").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
