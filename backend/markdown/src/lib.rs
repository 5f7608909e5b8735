//! Markdown handling for model responses.
//!
//! Splits the vision model's markdown answer into titled sections and
//! flattens each section into plain text that a speech engine can read.

pub mod renderer;
pub mod scanner;
pub mod sectionizer;

pub use renderer::Renderer;
pub use scanner::{HeadingMatch, HeadingScanner};
pub use sectionizer::{sectionize, split_spans, SectionSpan, SpanKind};
