//! Integration tests for the OCR service with hand-written collaborators.
//!
//! Covers batch failure policies, the concurrency cap, per-unit language
//! checks, and loading configuration files.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};

use scribe_core::{
    BatchPolicy, EngineConfig, ErrorKind, InputValue, NormalizedImage, OcrBackend, OcrService,
    PageSelection, Rasterizer, ScribeConfig, ScribeError, ScribeResult,
};

/// Backend that returns nothing for images narrower than 10 pixels and
/// tracks how many recognitions run at once.
#[derive(Default)]
struct FakeBackend {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    language_queries: AtomicUsize,
    /// Language list disappears after this many queries.
    languages_until: Option<usize>,
}

#[async_trait]
impl OcrBackend for FakeBackend {
    async fn supported_languages(&self) -> ScribeResult<Vec<String>> {
        let queries = self.language_queries.fetch_add(1, Ordering::SeqCst);
        match self.languages_until {
            Some(limit) if queries >= limit => Ok(vec!["osd".to_string()]),
            _ => Ok(vec!["eng".to_string(), "osd".to_string()]),
        }
    }

    async fn recognize(
        &self,
        image: &NormalizedImage,
        _language: &str,
        _config: &EngineConfig,
    ) -> ScribeResult<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if image.width() < 10 {
            Ok("   ".to_string())
        } else {
            Ok(format!("width {}", image.width()))
        }
    }

    async fn version(&self) -> ScribeResult<String> {
        Ok("fake".to_string())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Rasterizer whose pages are `n` pixels wide, so page 1 recognizes as empty.
struct NarrowPages;

#[async_trait]
impl Rasterizer for NarrowPages {
    async fn page_count(&self, _pdf: Arc<[u8]>) -> ScribeResult<u32> {
        Ok(2)
    }

    async fn rasterize(
        &self,
        _pdf: Arc<[u8]>,
        pages: Vec<u32>,
    ) -> ScribeResult<Vec<(u32, RgbImage)>> {
        Ok(pages
            .into_iter()
            .map(|n| (n, RgbImage::from_pixel(if n == 1 { 5 } else { 50 }, 5, Rgb([0, 0, 0]))))
            .collect())
    }

    fn name(&self) -> &'static str {
        "narrow"
    }
}

fn png(width: u32) -> InputValue {
    let mut out = Vec::new();
    RgbImage::from_pixel(width, 8, Rgb([255, 255, 255]))
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    InputValue::Bytes(out)
}

fn service(config: ScribeConfig, backend: Arc<FakeBackend>) -> OcrService {
    OcrService::new(config, backend, Arc::new(NarrowPages))
}

#[tokio::test]
async fn test_best_effort_batch_reports_each_slot() {
    let service = service(ScribeConfig::default(), Arc::new(FakeBackend::default()));

    let results = service
        .perform_batch_ocr(vec![png(20), png(4), png(30)], None, None)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap(), "width 20");
    assert!(matches!(results[1], Err(ScribeError::EmptyResult)));
    assert_eq!(results[2].as_ref().unwrap(), "width 30");
}

#[tokio::test]
async fn test_fail_fast_batch_returns_first_error() {
    let config = ScribeConfig::builder()
        .batch_policy(BatchPolicy::FailFast)
        .build();
    let service = service(config, Arc::new(FakeBackend::default()));

    let err = service
        .perform_batch_ocr(vec![png(20), png(4), InputValue::Bytes(vec![9, 9])], None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScribeError::EmptyResult));
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn test_concurrency_cap_is_respected() {
    let backend = Arc::new(FakeBackend::default());
    let config = ScribeConfig::builder().max_concurrency(2).build();
    let service = service(config, backend.clone());

    let inputs = (0..6).map(|i| png(20 + i)).collect();
    let results = service.perform_batch_ocr(inputs, None, None).await.unwrap();

    assert!(results.iter().all(|r| r.is_ok()));
    assert!(backend.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_unbounded_batch_runs_concurrently() {
    let backend = Arc::new(FakeBackend::default());
    let service = service(ScribeConfig::default(), backend.clone());

    let inputs = (0..4).map(|i| png(20 + i)).collect();
    service.perform_batch_ocr(inputs, None, None).await.unwrap();

    assert!(backend.peak.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_batch_units_recheck_language() {
    // The up-front check sees "eng"; by the time units run it is gone.
    let backend = Arc::new(FakeBackend {
        languages_until: Some(1),
        ..Default::default()
    });
    let service = service(ScribeConfig::default(), backend);

    let results = service
        .perform_batch_ocr(vec![png(20), png(20)], Some("eng"), None)
        .await
        .unwrap();

    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParams);
        assert!(err.to_string().contains("Available languages: osd"));
    }
}

#[tokio::test]
async fn test_pdf_pages_recheck_language() {
    // The up-front check sees "eng"; every page check afterwards does not.
    let backend = Arc::new(FakeBackend {
        languages_until: Some(1),
        ..Default::default()
    });
    let service = service(ScribeConfig::default(), backend.clone());

    let err = service
        .perform_pdf_ocr(
            InputValue::Bytes(b"%PDF".to_vec()),
            Some("eng"),
            PageSelection::All,
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ScribeError::UnsupportedLanguage { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidParams);
    // One up-front query plus one per page.
    assert_eq!(backend.language_queries.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_pdf_skips_empty_page() {
    let service = service(ScribeConfig::default(), Arc::new(FakeBackend::default()));

    let text = service
        .perform_pdf_ocr(
            InputValue::Bytes(b"%PDF".to_vec()),
            None,
            PageSelection::All,
            None,
        )
        .await
        .unwrap();
    assert_eq!(text, "--- Page 2 ---\nwidth 50");
}

#[tokio::test]
async fn test_pdf_fails_when_every_page_fails() {
    let service = service(ScribeConfig::default(), Arc::new(FakeBackend::default()));

    let err = service
        .perform_pdf_ocr(
            InputValue::Bytes(b"%PDF".to_vec()),
            None,
            PageSelection::single(1),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScribeError::EmptyResult));
}

#[tokio::test]
async fn test_invalid_engine_config_fails_before_loading() {
    let backend = Arc::new(FakeBackend::default());
    let service = service(ScribeConfig::default(), backend.clone());

    let err = service
        .perform_ocr(png(20), None, Some("--psm 99"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParams);
    assert_eq!(backend.language_queries.load(Ordering::SeqCst), 0);
}

#[test]
fn test_config_from_toml_and_yaml() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("config.toml");
    std::fs::write(
        &toml_path,
        "default_language = \"deu\"\nbatch_policy = \"fail_fast\"\nmax_concurrency = 4\n",
    )
    .unwrap();
    let config = ScribeConfig::from_file(&toml_path).unwrap();
    assert_eq!(config.default_language, "deu");
    assert_eq!(config.batch_policy, BatchPolicy::FailFast);
    assert_eq!(config.max_concurrency, Some(4));
    assert_eq!(config.pdf_dpi, 300);

    let yaml_path = dir.path().join("config.yaml");
    std::fs::write(&yaml_path, "pdf_dpi: 150\nimage_fetch_timeout_secs: 5\n").unwrap();
    let config = ScribeConfig::from_file(&yaml_path).unwrap();
    assert_eq!(config.pdf_dpi, 150);
    assert_eq!(config.image_fetch_timeout(), Duration::from_secs(5));
    assert_eq!(config.default_language, "eng");
}

#[test]
fn test_config_file_with_env_overlay() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"default_language": "fra", "pdf_dpi": 200}"#).unwrap();

    let config = ScribeConfig::from_file(&path)
        .unwrap()
        .with_overrides(|key| match key {
            "SCRIBE_PDF_DPI" => Some("600".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.default_language, "fra");
    assert_eq!(config.pdf_dpi, 600);
    config.validate().unwrap();
}
