pub mod engine;
pub mod google;

pub use engine::{create_tts, AudioFormat, OpenAiTts, TtsProvider, TtsProviderKind, TtsRequest};
pub use google::{chunk_text, GoogleTranslateTts, MAX_CHUNK_CHARS};
