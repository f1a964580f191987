//! Page selection and rasterized page sets for PDF inputs.

use super::NormalizedImage;

/// Which pages of a PDF to process.
///
/// Values are signed so that zero and negative page numbers can be skipped
/// with a warning instead of failing the whole request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSelection {
    /// Every page, in document order.
    #[default]
    All,
    /// Only the listed 1-indexed pages.
    Pages(Vec<i64>),
}

impl PageSelection {
    /// Select a single page.
    pub fn single(page: i64) -> Self {
        Self::Pages(vec![page])
    }

    /// Resolve against a document's page count.
    ///
    /// Returns valid page numbers sorted in document order without duplicates.
    /// Out-of-range values are dropped with a warning.
    pub fn resolve(&self, page_count: u32) -> Vec<u32> {
        match self {
            PageSelection::All => (1..=page_count).collect(),
            PageSelection::Pages(requested) => {
                let mut pages: Vec<u32> = requested
                    .iter()
                    .filter_map(|&page| {
                        if page >= 1 && page <= i64::from(page_count) {
                            Some(page as u32)
                        } else {
                            tracing::warn!(
                                page,
                                page_count,
                                "Skipping out-of-range page {} (document has {} pages)",
                                page,
                                page_count
                            );
                            None
                        }
                    })
                    .collect();
                pages.sort_unstable();
                pages.dedup();
                pages
            }
        }
    }
}

impl From<Vec<i64>> for PageSelection {
    fn from(pages: Vec<i64>) -> Self {
        Self::Pages(pages)
    }
}

/// One rasterized page.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-indexed page number in the original document.
    pub number: u32,
    pub image: NormalizedImage,
}

/// Rasterized pages of one document, in document order.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    page_count: u32,
    pages: Vec<Page>,
}

impl PageSet {
    /// Build a page set, ordering pages by page number.
    pub fn new(page_count: u32, mut pages: Vec<Page>) -> Self {
        pages.sort_by_key(|p| p.number);
        Self { page_count, pages }
    }

    /// Total pages in the source document, not just the selected ones.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page numbers that were rasterized.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.number).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
