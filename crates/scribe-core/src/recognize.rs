//! OCR invocation and output normalization.

use crate::error::{ScribeError, ScribeResult};
use crate::traits::OcrBackend;
use crate::types::{EngineConfig, NormalizedImage};

/// Run the backend on one image and normalize its output.
///
/// The result is trimmed. Whitespace-only output is [`ScribeError::EmptyResult`].
pub async fn recognize(
    backend: &dyn OcrBackend,
    image: &NormalizedImage,
    language: &str,
    config: &EngineConfig,
) -> ScribeResult<String> {
    let text = backend
        .recognize(image, language, config)
        .await
        .map_err(|e| match e {
            ScribeError::Recognition(_) => e,
            other => ScribeError::recognition(other.to_string()),
        })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ScribeError::EmptyResult);
    }
    Ok(text.to_string())
}
