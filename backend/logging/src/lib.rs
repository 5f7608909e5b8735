//! Structured logging for Soilcast.
//!
//! Console and rolling-file subscribers, plus redaction of API keys before
//! upstream error text reaches logs or clients.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
