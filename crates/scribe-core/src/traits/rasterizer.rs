//! PDF rasterizer trait.

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;

use crate::error::ScribeResult;

/// Renders PDF pages into RGB rasters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Number of pages in the document.
    async fn page_count(&self, pdf: Arc<[u8]>) -> ScribeResult<u32>;

    /// Render the given 1-indexed pages, returning `(page_number, image)` pairs.
    async fn rasterize(&self, pdf: Arc<[u8]>, pages: Vec<u32>) -> ScribeResult<Vec<(u32, RgbImage)>>;

    /// Human-readable rasterizer name.
    fn name(&self) -> &'static str;
}
