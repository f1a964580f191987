//! MCP tool input/output type definitions.
//!
//! These types are used with `schemars::JsonSchema` to generate the JSON Schema
//! that MCP clients use to understand tool parameters.

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use scribe_core::{InputValue, PageSelection, ScribeError, ScribeResult};

/// An image or document: a string (URL, file path, base64, or data URI)
/// or an array of raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum InputData {
    /// URL, file path, base64 string, or `data:` URI.
    Text(String),
    /// Raw file contents as byte values.
    Bytes(Vec<u8>),
}

impl From<InputData> for InputValue {
    fn from(input: InputData) -> Self {
        match input {
            InputData::Text(text) => InputValue::Text(text),
            InputData::Bytes(bytes) => InputValue::Bytes(bytes),
        }
    }
}

/// One page number or a list of page numbers (1-indexed).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PagesParam {
    One(i64),
    Many(Vec<i64>),
}

impl From<PagesParam> for PageSelection {
    fn from(pages: PagesParam) -> Self {
        match pages {
            PagesParam::One(page) => PageSelection::single(page),
            PagesParam::Many(pages) => PageSelection::Pages(pages),
        }
    }
}

/// Input for perform_ocr tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PerformOcrInput {
    /// The image: http(s) URL, file path, base64 string, data URI, or byte array.
    pub input: InputData,

    /// Tesseract language code, e.g. "eng" or "deu". Defaults to the server's
    /// default language.
    #[serde(default)]
    pub language: Option<String>,

    /// Tesseract configuration string, e.g. "--oem 3 --psm 6".
    #[serde(default)]
    pub config: Option<String>,
}

/// Input for perform_pdf_ocr tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PerformPdfOcrInput {
    /// The PDF: http(s) URL, file path, base64 string, data URI, or byte array.
    pub input: InputData,

    /// Tesseract language code.
    #[serde(default)]
    pub language: Option<String>,

    /// Page number or list of page numbers to process (1-indexed).
    /// Every page is processed when omitted.
    #[serde(default)]
    pub pages: Option<PagesParam>,

    /// Tesseract configuration string.
    #[serde(default)]
    pub config: Option<String>,
}

impl PerformPdfOcrInput {
    pub fn page_selection(&self) -> PageSelection {
        self.pages
            .clone()
            .map(PageSelection::from)
            .unwrap_or(PageSelection::All)
    }
}

/// Input for perform_batch_ocr tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PerformBatchOcrInput {
    /// Images to process. Results come back in the same order.
    pub inputs: Vec<InputData>,

    /// Tesseract language code applied to every image.
    #[serde(default)]
    pub language: Option<String>,

    /// Tesseract configuration string applied to every image.
    #[serde(default)]
    pub config: Option<String>,
}

/// Failure of a single batch item.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BatchItemError {
    /// "invalid_params" or "internal".
    pub kind: String,

    /// Human-readable error message.
    pub message: String,
}

impl From<&ScribeError> for BatchItemError {
    fn from(e: &ScribeError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

/// Result of one batch item, at the same position as its input.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BatchOcrEntry {
    /// Position of the input in the request.
    pub index: usize,

    /// Extracted text, when the item succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Error, when the item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchItemError>,
}

impl BatchOcrEntry {
    pub fn from_result(index: usize, result: &ScribeResult<String>) -> Self {
        match result {
            Ok(text) => Self {
                index,
                text: Some(text.clone()),
                error: None,
            },
            Err(e) => Self {
                index,
                text: None,
                error: Some(e.into()),
            },
        }
    }
}
