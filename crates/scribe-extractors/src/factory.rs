//! Factory for creating OCR collaborators.

use std::sync::Arc;

use scribe_core::traits::{OcrBackend, Rasterizer};
use scribe_core::{OcrService, ScribeConfig};

use crate::{MupdfRasterizer, TesseractBackend};

/// Factory for creating the backend, the rasterizer, and the service using them.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create the Tesseract OCR backend.
    pub fn tesseract() -> Arc<dyn OcrBackend> {
        Arc::new(TesseractBackend::new())
    }

    /// Create the PDF rasterizer at the configured DPI.
    pub fn rasterizer(config: &ScribeConfig) -> Arc<dyn Rasterizer> {
        Arc::new(MupdfRasterizer::with_dpi(config.pdf_dpi))
    }

    /// Create an [`OcrService`] backed by Tesseract and MuPDF.
    pub fn service(config: ScribeConfig) -> OcrService {
        let rasterizer = Self::rasterizer(&config);
        OcrService::new(config, Self::tesseract(), rasterizer)
    }
}
