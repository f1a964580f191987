//! A single unit of OCR work.

use super::{EngineConfig, RawInput};

/// One input plus the language and engine settings to recognize it with.
#[derive(Debug, Clone)]
pub struct OcrRequest {
    pub input: RawInput,
    pub language: String,
    pub engine: EngineConfig,
}

impl OcrRequest {
    /// Create a new request.
    pub fn new(input: RawInput, language: impl Into<String>, engine: EngineConfig) -> Self {
        Self {
            input,
            language: language.into(),
            engine,
        }
    }
}
