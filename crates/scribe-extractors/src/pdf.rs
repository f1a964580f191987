//! PDF page rasterization using MuPDF.
//!
//! MuPDF documents are not thread-safe, so each call opens the document
//! inside its own spawn_blocking task and drops it before returning.

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;

use scribe_core::error::{ScribeError, ScribeResult};
use scribe_core::traits::Rasterizer;

#[cfg(feature = "pdf")]
use mupdf::{Colorspace, Document, Matrix, Pixmap};

/// Default rendering resolution. PDF user space is 72 points per inch.
pub const DEFAULT_PDF_DPI: u32 = 300;

/// PDF rasterizer rendering pages to RGB at a fixed DPI.
#[derive(Debug, Clone)]
pub struct MupdfRasterizer {
    dpi: u32,
}

impl MupdfRasterizer {
    /// Create a rasterizer with the default DPI.
    pub fn new() -> Self {
        Self::with_dpi(DEFAULT_PDF_DPI)
    }

    /// Create a rasterizer with a custom DPI.
    pub fn with_dpi(dpi: u32) -> Self {
        Self { dpi: dpi.max(1) }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    fn scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }
}

impl Default for MupdfRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "pdf")]
fn open(pdf: &[u8]) -> ScribeResult<Document> {
    Document::from_bytes(pdf, "application/pdf")
        .map_err(|e| ScribeError::rasterize(format!("cannot open document: {}", e)))
}

/// Copy pixmap samples into an RGB buffer, dropping any alpha channel.
#[cfg(feature = "pdf")]
fn pixmap_to_rgb(pixmap: &Pixmap) -> ScribeResult<RgbImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(ScribeError::rasterize(format!(
            "unexpected pixmap with {} components",
            n
        )));
    }

    let samples = pixmap.samples();
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for pixel in samples.chunks_exact(n) {
        rgb.extend_from_slice(&pixel[..3]);
    }

    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| ScribeError::rasterize("pixmap size does not match its samples"))
}

#[async_trait]
impl Rasterizer for MupdfRasterizer {
    #[cfg(feature = "pdf")]
    async fn page_count(&self, pdf: Arc<[u8]>) -> ScribeResult<u32> {
        tokio::task::spawn_blocking(move || {
            let count = open(&pdf)?
                .page_count()
                .map_err(|e| ScribeError::rasterize(e.to_string()))?;
            u32::try_from(count)
                .map_err(|_| ScribeError::rasterize(format!("invalid page count {}", count)))
        })
        .await?
    }

    #[cfg(feature = "pdf")]
    async fn rasterize(&self, pdf: Arc<[u8]>, pages: Vec<u32>) -> ScribeResult<Vec<(u32, RgbImage)>> {
        let scale = self.scale();

        tokio::task::spawn_blocking(move || {
            let document = open(&pdf)?;
            let matrix = Matrix::new_scale(scale, scale);
            let colorspace = Colorspace::device_rgb();

            pages
                .into_iter()
                .map(|number| {
                    let index = number
                        .checked_sub(1)
                        .ok_or_else(|| ScribeError::rasterize("page numbers start at 1"))?;
                    let page = document.load_page(index as i32).map_err(|e| {
                        ScribeError::rasterize(format!("cannot load page {}: {}", number, e))
                    })?;
                    let pixmap = page.to_pixmap(&matrix, &colorspace, false, true).map_err(|e| {
                        ScribeError::rasterize(format!("cannot render page {}: {}", number, e))
                    })?;
                    tracing::debug!(
                        page = number,
                        width = pixmap.width(),
                        height = pixmap.height(),
                        "Rendered PDF page"
                    );
                    Ok((number, pixmap_to_rgb(&pixmap)?))
                })
                .collect()
        })
        .await?
    }

    #[cfg(not(feature = "pdf"))]
    async fn page_count(&self, _pdf: Arc<[u8]>) -> ScribeResult<u32> {
        Err(disabled())
    }

    #[cfg(not(feature = "pdf"))]
    async fn rasterize(
        &self,
        _pdf: Arc<[u8]>,
        _pages: Vec<u32>,
    ) -> ScribeResult<Vec<(u32, RgbImage)>> {
        Err(disabled())
    }

    fn name(&self) -> &'static str {
        "mupdf"
    }
}

#[cfg(not(feature = "pdf"))]
fn disabled() -> ScribeError {
    ScribeError::Configuration("PDF feature not enabled. Enable the 'pdf' feature.".to_string())
}

/// Build a small PDF with one US-letter page per entry.
///
/// Non-empty entries are drawn as one line of 48pt Helvetica near the top of
/// the page; empty entries give blank pages.
#[cfg(test)]
pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let page_ref = |i: usize| 4 + 2 * i;
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            (0..pages.len())
                .map(|i| format!("{} 0 R", page_ref(i)))
                .collect::<Vec<_>>()
                .join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_ref(i) + 1
        ));
        let content = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 48 Tf 72 650 Td ({}) Tj ET", text)
        };
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        )
        .as_bytes(),
    );
    pdf
}
