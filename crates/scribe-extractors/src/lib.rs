//! scribe-extractors - OCR and PDF rasterization backends for scribe.
//!
//! Implements the collaborator traits from `scribe-core` on top of
//! external engines.
//!
//! # Features
//!
//! - `tesseract` (default) - OCR via the Tesseract CLI (requires tesseract installed)
//! - `pdf` (default) - PDF page rendering via MuPDF
//!
//! With a feature disabled the corresponding backend still exists but
//! every call returns a configuration error.
//!
//! # Example
//!
//! ```ignore
//! use scribe_extractors::ExtractorFactory;
//!
//! let config = scribe_core::ScribeConfig::load()?;
//! let service = ExtractorFactory::service(config);
//! let languages = service.supported_languages().await?;
//! ```

mod factory;
mod pdf;
mod tesseract;

pub use factory::ExtractorFactory;
pub use pdf::{MupdfRasterizer, DEFAULT_PDF_DPI};
pub use tesseract::TesseractBackend;
