//! scribe-core - Core library for scribe.
//!
//! This crate resolves OCR inputs and dispatches them to an OCR backend:
//! it classifies inputs (URL, path, base64, bytes), loads them into
//! normalized RGB rasters, checks the requested language against the
//! backend, runs recognition, and fans batches and PDF pages out
//! concurrently while keeping results in input order.
//!
//! The OCR engine and the PDF rasterizer are collaborators behind the
//! [`OcrBackend`] and [`Rasterizer`] traits.
//!
//! # Example
//!
//! ```ignore
//! use scribe_core::{OcrService, PageSelection, ScribeConfig};
//!
//! let service = OcrService::new(ScribeConfig::default(), backend, rasterizer);
//!
//! // Single image from a URL, path, base64 string, or bytes
//! let text = service.perform_ocr("https://example.com/scan.png".into(), None, None).await?;
//!
//! // Pages 1 and 3 of a PDF
//! let text = service
//!     .perform_pdf_ocr("/tmp/report.pdf".into(), Some("eng"), PageSelection::Pages(vec![1, 3]), None)
//!     .await?;
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod fanout;
pub mod gate;
pub mod health;
pub mod loader;
pub mod recognize;
pub mod service;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use classify::{classify, classify_text};
pub use config::{ScribeConfig, ScribeConfigBuilder};
pub use error::{ErrorCode, ErrorKind, ScribeError, ScribeResult};
pub use fanout::{format_pages, page_marker, BatchPolicy, FanOut};
pub use gate::check_language;
pub use health::{check_backend, HealthReport, PackageManager};
pub use loader::{DocumentLoader, ImageLoader, PdfDocument};
pub use recognize::recognize;
pub use service::OcrService;
pub use traits::{OcrBackend, Rasterizer};
pub use types::{
    EngineConfig, InputValue, NormalizedImage, OcrRequest, Page, PageSelection, PageSet,
    RawInput, DEFAULT_ENGINE_CONFIG,
};
