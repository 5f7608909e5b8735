//! Upload page served at `/`.
//!
//! A single static page compiled into the binary: pick a report, choose a
//! language, and play back each narrated section.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Handler for `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
