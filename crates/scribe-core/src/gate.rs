//! Language capability gate.

use crate::error::{ScribeError, ScribeResult};
use crate::traits::OcrBackend;

/// Fail unless the backend currently supports `language`.
///
/// Queries the backend on every call. The error lists the full supported set.
pub async fn check_language(backend: &dyn OcrBackend, language: &str) -> ScribeResult<()> {
    let available = backend.supported_languages().await?;
    if available.iter().any(|code| code == language) {
        Ok(())
    } else {
        tracing::debug!(language, available = available.len(), "Rejected unsupported language");
        Err(ScribeError::unsupported_language(language, available))
    }
}
