//! Soilcast Gateway HTTP API Server
//!
//! Accepts soil report uploads, runs them through the vision model, splits the
//! answer into sections and narrates each one. Also serves the generated audio
//! and a small upload page.

pub mod analyze;
pub mod control_ui;
pub mod error;
pub mod health_api;
pub mod narration;
pub mod pipeline;
pub mod server;

pub use error::ApiError;
pub use narration::{Narration, NarrationOptions};
pub use pipeline::{analyze_upload, Upload};
pub use server::{build_router, start_server, GatewayState};
