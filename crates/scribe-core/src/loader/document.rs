//! PDF loading: acquire bytes, resolve the page selection, then rasterize.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{ScribeError, ScribeResult};
use crate::traits::Rasterizer;
use crate::types::{NormalizedImage, Page, PageSelection, PageSet, RawInput};

use super::{acquire_bytes, PDF_FETCH_TIMEOUT};

/// Loads PDF documents as rasterized [`PageSet`]s.
#[derive(Clone)]
pub struct DocumentLoader {
    rasterizer: Arc<dyn Rasterizer>,
    fetch_timeout: Duration,
}

impl DocumentLoader {
    /// Create a document loader with the default PDF fetch timeout.
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            rasterizer,
            fetch_timeout: PDF_FETCH_TIMEOUT,
        }
    }

    /// Override the URL fetch timeout.
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Acquire a PDF and resolve the selection against its page count.
    ///
    /// Nothing is rasterized yet. Out-of-range page numbers are skipped with a
    /// warning, so the selection may be empty without this being an error.
    pub async fn open(
        &self,
        input: RawInput,
        selection: &PageSelection,
    ) -> ScribeResult<PdfDocument> {
        let source = input.describe();
        let bytes: Arc<[u8]> = acquire_bytes(input, self.fetch_timeout).await?.into();
        if bytes.is_empty() {
            return Err(ScribeError::rasterize("document is empty"));
        }

        let page_count = self.rasterizer.page_count(bytes.clone()).await?;
        let selected = selection.resolve(page_count);
        tracing::debug!(
            source = %source,
            page_count,
            selected = selected.len(),
            "Opened PDF"
        );

        Ok(PdfDocument {
            bytes,
            page_count,
            selected,
        })
    }

    /// Rasterize some pages of an opened document.
    pub async fn render(&self, document: &PdfDocument, numbers: &[u32]) -> ScribeResult<Vec<Page>> {
        if numbers.is_empty() {
            return Ok(Vec::new());
        }

        let rendered = self
            .rasterizer
            .rasterize(document.bytes.clone(), numbers.to_vec())
            .await?;
        rendered
            .into_iter()
            .map(|(number, pixels)| {
                let image = NormalizedImage::new(pixels).map_err(|_| {
                    ScribeError::rasterize(format!("page {} rendered to an empty image", number))
                })?;
                Ok(Page { number, image })
            })
            .collect()
    }

    /// Acquire a PDF and rasterize every selected page at once.
    pub async fn load_pdf(
        &self,
        input: RawInput,
        selection: &PageSelection,
    ) -> ScribeResult<PageSet> {
        let document = self.open(input, selection).await?;
        let pages = self.render(&document, document.selected()).await?;
        Ok(PageSet::new(document.page_count(), pages))
    }
}

/// An acquired PDF with its resolved page selection, not yet rasterized.
#[derive(Clone)]
pub struct PdfDocument {
    bytes: Arc<[u8]>,
    page_count: u32,
    selected: Vec<u32>,
}

impl PdfDocument {
    /// Total pages in the document.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Selected page numbers in document order.
    pub fn selected(&self) -> &[u32] {
        &self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockRasterizer;
    use image::{Rgb, RgbImage};
    use mockall::predicate::eq;

    fn page_image() -> RgbImage {
        RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]))
    }

    #[tokio::test]
    async fn test_selected_page_only() {
        let mut rasterizer = MockRasterizer::new();
        rasterizer.expect_page_count().returning(|_| Ok(3));
        rasterizer
            .expect_rasterize()
            .with(mockall::predicate::always(), eq(vec![2u32]))
            .times(1)
            .returning(|_, pages| Ok(pages.into_iter().map(|n| (n, page_image())).collect()));

        let loader = DocumentLoader::new(Arc::new(rasterizer));
        let pages = loader
            .load_pdf(RawInput::Bytes(b"%PDF-1.4".to_vec()), &PageSelection::single(2))
            .await
            .unwrap();

        assert_eq!(pages.page_count(), 3);
        assert_eq!(pages.page_numbers(), vec![2]);
    }

    #[tokio::test]
    async fn test_out_of_range_selection_skips_rasterizing() {
        let mut rasterizer = MockRasterizer::new();
        rasterizer.expect_page_count().returning(|_| Ok(3));
        rasterizer.expect_rasterize().never();

        let loader = DocumentLoader::new(Arc::new(rasterizer));
        let pages = loader
            .load_pdf(RawInput::Bytes(b"%PDF-1.4".to_vec()), &PageSelection::single(99))
            .await
            .unwrap();

        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn test_rasterizer_rejection_propagates() {
        let mut rasterizer = MockRasterizer::new();
        rasterizer
            .expect_page_count()
            .returning(|_| Err(ScribeError::rasterize("not a PDF")));

        let loader = DocumentLoader::new(Arc::new(rasterizer));
        let err = loader
            .load_pdf(RawInput::Bytes(b"hello".to_vec()), &PageSelection::All)
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::Rasterize(_)));
    }

    #[tokio::test]
    async fn test_empty_payload_is_rejected() {
        let loader = DocumentLoader::new(Arc::new(MockRasterizer::new()));
        let err = loader
            .load_pdf(RawInput::Bytes(Vec::new()), &PageSelection::All)
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::Rasterize(_)));
    }

    #[tokio::test]
    async fn test_render_in_chunks() {
        let mut rasterizer = MockRasterizer::new();
        rasterizer.expect_page_count().returning(|_| Ok(5));
        rasterizer
            .expect_rasterize()
            .with(mockall::predicate::always(), eq(vec![1u32, 2]))
            .times(1)
            .returning(|_, pages| Ok(pages.into_iter().map(|n| (n, page_image())).collect()));
        rasterizer
            .expect_rasterize()
            .with(mockall::predicate::always(), eq(vec![4u32]))
            .times(1)
            .returning(|_, pages| Ok(pages.into_iter().map(|n| (n, page_image())).collect()));

        let loader = DocumentLoader::new(Arc::new(rasterizer));
        let document = loader
            .open(
                RawInput::Bytes(b"%PDF-1.4".to_vec()),
                &PageSelection::Pages(vec![4, 2, 1, 9]),
            )
            .await
            .unwrap();
        assert_eq!(document.selected(), &[1, 2, 4]);

        let mut numbers = Vec::new();
        for chunk in document.selected().chunks(2) {
            let pages = loader.render(&document, chunk).await.unwrap();
            numbers.extend(pages.iter().map(|p| p.number));
        }
        assert_eq!(numbers, vec![1, 2, 4]);
    }
}
