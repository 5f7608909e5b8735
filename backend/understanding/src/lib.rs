pub mod prompt;
pub mod vision;

pub use prompt::{PromptTemplate, LANGUAGE_PLACEHOLDER, SOIL_REPORT_PROMPT};
pub use vision::{
    create_vision, GeminiVision, ImageInput, OpenAiVision, VisionModel, VisionProviderKind,
};
