//! OCR backend trait.

use async_trait::async_trait;

use crate::error::ScribeResult;
use crate::types::{EngineConfig, NormalizedImage};

/// Core OCR backend trait - all recognition engines implement this.
///
/// Implementations wrap an external engine. Calls may block for a long time
/// and must not stall the async runtime.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Language codes the backend supports right now.
    ///
    /// Queried on every call; language packs can change while the server runs.
    async fn supported_languages(&self) -> ScribeResult<Vec<String>>;

    /// Recognize text in an image. Returns the engine output untrimmed.
    async fn recognize(
        &self,
        image: &NormalizedImage,
        language: &str,
        config: &EngineConfig,
    ) -> ScribeResult<String>;

    /// Engine version string, used by the startup health check.
    async fn version(&self) -> ScribeResult<String>;

    /// Human-readable backend name.
    fn name(&self) -> &'static str;
}
