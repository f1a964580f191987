//! The OCR service behind the tools.
//!
//! Every flow follows the same path: resolve parameters, check the language
//! against the backend, classify the input, load it, recognize it. Batch and
//! PDF flows fan the last steps out per unit.

use std::sync::Arc;

use crate::classify::classify;
use crate::config::ScribeConfig;
use crate::error::{ScribeError, ScribeResult};
use crate::fanout::{format_pages, BatchPolicy, FanOut};
use crate::gate::check_language;
use crate::loader::{DocumentLoader, ImageLoader};
use crate::recognize::recognize;
use crate::traits::{OcrBackend, Rasterizer};
use crate::types::{EngineConfig, InputValue, OcrRequest, Page, PageSelection};

/// OCR service wiring the loaders, the capability gate, and the backend.
#[derive(Clone)]
pub struct OcrService {
    config: ScribeConfig,
    backend: Arc<dyn OcrBackend>,
    images: ImageLoader,
    documents: DocumentLoader,
    fan_out: FanOut,
}

impl OcrService {
    /// Create a new service.
    pub fn new(
        config: ScribeConfig,
        backend: Arc<dyn OcrBackend>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Self {
        let images = ImageLoader::new(config.image_fetch_timeout());
        let documents =
            DocumentLoader::new(rasterizer).with_fetch_timeout(config.pdf_fetch_timeout());
        let fan_out = FanOut::new(config.batch_policy, config.max_concurrency);
        Self {
            config,
            backend,
            images,
            documents,
            fan_out,
        }
    }

    pub fn config(&self) -> &ScribeConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn OcrBackend> {
        &self.backend
    }

    /// Apply defaults and parse the engine configuration.
    fn resolve_params(
        &self,
        language: Option<&str>,
        engine: Option<&str>,
    ) -> ScribeResult<(String, EngineConfig)> {
        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.config.default_language)
            .to_string();
        let engine = EngineConfig::parse(engine.unwrap_or(&self.config.default_engine_config))?;
        Ok((language, engine))
    }

    /// OCR a single image.
    pub async fn perform_ocr(
        &self,
        input: InputValue,
        language: Option<&str>,
        engine: Option<&str>,
    ) -> ScribeResult<String> {
        let (language, engine) = self.resolve_params(language, engine)?;
        check_language(self.backend.as_ref(), &language).await?;

        let raw = classify(input);
        tracing::info!(kind = raw.kind(), language = %language, config = %engine, "Performing OCR");

        let image = self.images.load(raw).await?;
        recognize(self.backend.as_ref(), &image, &language, &engine).await
    }

    /// OCR a PDF, returning page-labeled text in page order.
    ///
    /// Pages are best-effort: a page that fails is logged and left out. If
    /// every rendered page fails, the first failure is returned. If no
    /// requested page exists, the result is empty.
    pub async fn perform_pdf_ocr(
        &self,
        input: InputValue,
        language: Option<&str>,
        pages: PageSelection,
        engine: Option<&str>,
    ) -> ScribeResult<String> {
        let (language, engine) = self.resolve_params(language, engine)?;
        check_language(self.backend.as_ref(), &language).await?;

        let raw = classify(input);
        tracing::info!(kind = raw.kind(), language = %language, pages = ?pages, "Performing PDF OCR");

        let document = self.documents.open(raw, &pages).await?;
        if document.selected().is_empty() {
            tracing::info!(
                page_count = document.page_count(),
                "No requested pages in range; nothing to recognize"
            );
            return Ok(String::new());
        }

        // Only one chunk of rendered pages is held in memory at a time.
        let chunk_size = self
            .fan_out
            .max_concurrency()
            .unwrap_or(document.selected().len())
            .max(1);
        let fan_out = self.fan_out.with_policy(BatchPolicy::BestEffort);

        let mut recognized = Vec::with_capacity(document.selected().len());
        let mut first_error = None;
        for chunk in document.selected().chunks(chunk_size) {
            let pages = self.documents.render(&document, chunk).await?;
            let units = pages
                .iter()
                .map(|page| self.recognize_page(page, &language, &engine))
                .collect();
            let results = fan_out.run(units).await?;

            for (page, result) in pages.iter().zip(results) {
                match result {
                    Ok(text) => recognized.push((page.number, text)),
                    Err(e) => {
                        tracing::warn!(page = page.number, error = %e, "Skipping page that failed OCR");
                        first_error.get_or_insert(e);
                    }
                }
            }
        }

        match (recognized.is_empty(), first_error) {
            (true, Some(e)) => Err(e),
            _ => Ok(format_pages(&recognized)),
        }
    }

    async fn recognize_page(
        &self,
        page: &Page,
        language: &str,
        engine: &EngineConfig,
    ) -> ScribeResult<String> {
        check_language(self.backend.as_ref(), language).await?;
        recognize(self.backend.as_ref(), &page.image, language, engine).await
    }

    /// OCR several images concurrently.
    ///
    /// Results line up with `inputs`. Under the best-effort policy each slot
    /// holds its own outcome; under fail-fast the first error aborts the call.
    pub async fn perform_batch_ocr(
        &self,
        inputs: Vec<InputValue>,
        language: Option<&str>,
        engine: Option<&str>,
    ) -> ScribeResult<Vec<ScribeResult<String>>> {
        let (language, engine) = self.resolve_params(language, engine)?;
        check_language(self.backend.as_ref(), &language).await?;

        tracing::info!(
            inputs = inputs.len(),
            language = %language,
            policy = %self.fan_out.policy(),
            "Performing batch OCR"
        );

        let requests = inputs
            .into_iter()
            .map(|input| OcrRequest::new(classify(input), language.clone(), engine.clone()))
            .collect();
        self.run_batch(requests).await
    }

    /// Run prepared requests through the fan-out coordinator.
    pub async fn run_batch(
        &self,
        requests: Vec<OcrRequest>,
    ) -> ScribeResult<Vec<ScribeResult<String>>> {
        let units = requests
            .into_iter()
            .map(|request| self.run_unit(request))
            .collect();
        let results = self.fan_out.run(units).await?;

        for (index, result) in results.iter().enumerate() {
            if let Err(e) = result {
                tracing::warn!(index, error = %e, "Batch item failed");
            }
        }
        Ok(results)
    }

    async fn run_unit(&self, request: OcrRequest) -> ScribeResult<String> {
        check_language(self.backend.as_ref(), &request.language).await?;
        let image = self.images.load(request.input).await?;
        recognize(
            self.backend.as_ref(),
            &image,
            &request.language,
            &request.engine,
        )
        .await
    }

    /// Languages the backend supports right now, sorted.
    pub async fn supported_languages(&self) -> ScribeResult<Vec<String>> {
        let mut languages = self
            .backend
            .supported_languages()
            .await
            .map_err(|e| match e {
                ScribeError::Backend(_) => e,
                other => ScribeError::backend(format!("Failed to get supported languages: {}", other)),
            })?;
        if languages.is_empty() {
            return Err(ScribeError::backend(
                "No supported languages found. Please check Tesseract installation.",
            ));
        }
        languages.sort();
        languages.dedup();
        Ok(languages)
    }
}
