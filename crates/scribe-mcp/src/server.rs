//! MCP server implementation for scribe.
//!
//! Uses the rmcp SDK's macro-based approach for defining tools.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use scribe_core::{ErrorKind, InputValue, OcrService, ScribeError};

use crate::tools::*;

/// Convert a scribe error into the MCP error kind the client sees.
pub fn to_mcp_error(e: ScribeError) -> McpError {
    let data = Some(serde_json::json!({
        "code": e.code().as_str(),
        "suggestion": e.suggestion(),
    }));
    match e.kind() {
        ErrorKind::InvalidParams => McpError::invalid_params(e.to_string(), data),
        ErrorKind::Internal => McpError::internal_error(e.to_string(), data),
    }
}

fn json_text<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// MCP server for OCR operations.
///
/// Wraps an [`OcrService`] and exposes it as MCP tools.
#[derive(Clone)]
pub struct OcrServer {
    service: OcrService,
    tool_router: ToolRouter<OcrServer>,
}

#[tool_router]
impl OcrServer {
    /// Create a new OcrServer wrapping the given service.
    pub fn new(service: OcrService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    /// Extract text from a single image.
    #[tool(
        name = "perform_ocr",
        description = "Extract text from an image using Tesseract OCR. The input can be an http(s) URL, a file path, a base64 string or data URI, or an array of raw bytes."
    )]
    pub async fn perform_ocr(
        &self,
        Parameters(input): Parameters<PerformOcrInput>,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .service
            .perform_ocr(
                input.input.into(),
                input.language.as_deref(),
                input.config.as_deref(),
            )
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Extract text from the pages of a PDF.
    #[tool(
        name = "perform_pdf_ocr",
        description = "Extract text from a PDF by rendering its pages and running OCR on each. Output is labeled per page with '--- Page N ---' headers. Pages outside the document are skipped."
    )]
    pub async fn perform_pdf_ocr(
        &self,
        Parameters(input): Parameters<PerformPdfOcrInput>,
    ) -> Result<CallToolResult, McpError> {
        let pages = input.page_selection();
        let text = self
            .service
            .perform_pdf_ocr(
                input.input.into(),
                input.language.as_deref(),
                pages,
                input.config.as_deref(),
            )
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Extract text from several images concurrently.
    #[tool(
        name = "perform_batch_ocr",
        description = "Extract text from several images concurrently. Returns a JSON array with one entry per input, in input order, holding either the text or that input's error."
    )]
    pub async fn perform_batch_ocr(
        &self,
        Parameters(input): Parameters<PerformBatchOcrInput>,
    ) -> Result<CallToolResult, McpError> {
        let inputs: Vec<InputValue> = input.inputs.into_iter().map(Into::into).collect();
        let results = self
            .service
            .perform_batch_ocr(inputs, input.language.as_deref(), input.config.as_deref())
            .await
            .map_err(to_mcp_error)?;

        let entries: Vec<BatchOcrEntry> = results
            .iter()
            .enumerate()
            .map(|(index, result)| BatchOcrEntry::from_result(index, result))
            .collect();
        json_text(&entries)
    }

    /// List the OCR languages currently installed.
    #[tool(
        name = "get_supported_languages",
        description = "List the language codes the OCR backend currently supports."
    )]
    pub async fn get_supported_languages(&self) -> Result<CallToolResult, McpError> {
        let languages = self
            .service
            .supported_languages()
            .await
            .map_err(to_mcp_error)?;
        json_text(&languages)
    }
}

#[tool_handler]
impl ServerHandler for OcrServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Scribe OCR Server - Text extraction with Tesseract. \
                 Use perform_ocr for a single image, perform_pdf_ocr for PDF documents, \
                 perform_batch_ocr for several images at once, and get_supported_languages \
                 to see which language codes are available."
                    .to_string(),
            ),
        }
    }
}
