//! Tesseract OCR backend using rusty-tesseract.
//!
//! rusty-tesseract shells out to the `tesseract` binary, so every call runs
//! in spawn_blocking to keep the async runtime free.

use std::path::Path;

use async_trait::async_trait;

use scribe_core::error::{ScribeError, ScribeResult};
use scribe_core::traits::OcrBackend;
use scribe_core::types::{EngineConfig, NormalizedImage};

#[cfg(feature = "tesseract")]
use rusty_tesseract::{Args, Image};

/// OCR backend driving the Tesseract CLI.
#[derive(Debug, Clone, Default)]
pub struct TesseractBackend;

impl TesseractBackend {
    /// Create a new Tesseract backend.
    pub fn new() -> Self {
        Self
    }

    /// Put `dir` in front of `PATH` so the `tesseract` binary there wins.
    ///
    /// Call once at startup, before any worker threads exist.
    pub fn prepend_to_path(dir: &Path) {
        let mut paths = vec![dir.to_path_buf()];
        if let Some(current) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&current));
        }
        match std::env::join_paths(paths) {
            Ok(joined) => std::env::set_var("PATH", joined),
            Err(e) => tracing::warn!("Ignoring tesseract path {}: {}", dir.display(), e),
        }
    }

    #[cfg(feature = "tesseract")]
    fn args(language: &str, config: &EngineConfig) -> Args {
        let mut args = Args::default();
        args.lang = language.to_string();
        args.oem = config.oem;
        args.psm = config.psm;
        args.dpi = config.dpi;
        args.config_variables = config
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        args
    }
}

#[async_trait]
impl OcrBackend for TesseractBackend {
    #[cfg(feature = "tesseract")]
    async fn supported_languages(&self) -> ScribeResult<Vec<String>> {
        tokio::task::spawn_blocking(|| {
            rusty_tesseract::get_tesseract_langs()
                .map_err(|e| ScribeError::backend(format!("Failed to list languages: {}", e)))
        })
        .await?
    }

    #[cfg(feature = "tesseract")]
    async fn recognize(
        &self,
        image: &NormalizedImage,
        language: &str,
        config: &EngineConfig,
    ) -> ScribeResult<String> {
        let dynamic = image.to_dynamic();
        let args = Self::args(language, config);

        tokio::task::spawn_blocking(move || {
            let tesseract_image = Image::from_dynamic_image(&dynamic)
                .map_err(|e| ScribeError::recognition(e.to_string()))?;
            rusty_tesseract::image_to_string(&tesseract_image, &args)
                .map_err(|e| ScribeError::recognition(e.to_string()))
        })
        .await?
    }

    #[cfg(feature = "tesseract")]
    async fn version(&self) -> ScribeResult<String> {
        tokio::task::spawn_blocking(|| {
            rusty_tesseract::get_tesseract_version()
                .map(|v| v.lines().next().unwrap_or_default().trim().to_string())
                .map_err(|e| ScribeError::backend(e.to_string()))
        })
        .await?
    }

    #[cfg(not(feature = "tesseract"))]
    async fn supported_languages(&self) -> ScribeResult<Vec<String>> {
        Err(disabled())
    }

    #[cfg(not(feature = "tesseract"))]
    async fn recognize(
        &self,
        _image: &NormalizedImage,
        _language: &str,
        _config: &EngineConfig,
    ) -> ScribeResult<String> {
        Err(disabled())
    }

    #[cfg(not(feature = "tesseract"))]
    async fn version(&self) -> ScribeResult<String> {
        Err(disabled())
    }

    fn name(&self) -> &'static str {
        "tesseract"
    }
}

#[cfg(not(feature = "tesseract"))]
fn disabled() -> ScribeError {
    ScribeError::Configuration(
        "Tesseract feature not enabled. Enable the 'tesseract' feature.".to_string(),
    )
}
