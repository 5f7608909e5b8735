//! Maps domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use soilcast_core::SoilcastError;
use tracing::{error, warn};

/// Error returned by gateway handlers. Renders as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub SoilcastError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SoilcastError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SoilcastError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            SoilcastError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SoilcastError::UpstreamModel { .. } => StatusCode::BAD_GATEWAY,
            SoilcastError::AudioGeneration(_)
            | SoilcastError::Storage(_)
            | SoilcastError::Config(_)
            | SoilcastError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SoilcastError> for ApiError {
    fn from(err: SoilcastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Provider errors can echo request URLs; scrub keys before they leave.
        let message = logging::redact_sensitive_data(&self.0.to_string());
        if self.0.is_client_error() {
            warn!(status = status.as_u16(), error = %message, "Request rejected");
        } else {
            error!(status = status.as_u16(), error = %message, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn maps_variants_to_status_codes() {
        let cases = [
            (SoilcastError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (
                SoilcastError::UnsupportedMedia("text/plain".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (SoilcastError::PayloadTooLarge("limit".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (SoilcastError::upstream("gemini", "boom"), StatusCode::BAD_GATEWAY),
            (SoilcastError::Storage("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[tokio::test]
    async fn body_is_redacted_json() {
        let err = SoilcastError::upstream(
            "gemini",
            "error sending request for url (https://example.com/v1?key=AIzaSyA1234567890abcdefghijklmnopqrstu)",
        );
        let resp = ApiError(err).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let message = json["error"].as_str().unwrap();
        assert!(message.starts_with("vision model error (gemini)"));
        assert!(!message.contains("AIzaSyA1234567890"));
    }
}
