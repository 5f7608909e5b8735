//! Local media handling: uploaded images, generated narration audio, and the
//! HTTP route that serves audio back to clients.

pub mod media_server;
pub mod mime_detect;
pub mod storage;

pub use media_server::{audio_router, AUDIO_ROUTE_PREFIX};
pub use mime_detect::{detect_mime_type, is_image, is_inline_safe, is_supported_upload};
pub use storage::{audio_url, file_stem, is_safe_filename, sanitize_filename, MediaStore};
