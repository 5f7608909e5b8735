pub mod error;
pub mod language;
pub mod types;

pub use error::{Result, SoilcastError};
pub use language::Language;
pub use types::{NarratedSection, Section, ANALYSIS_RESULT_TITLE, OVERALL_ANALYSIS_TITLE};
