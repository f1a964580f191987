//! MCP server for scribe OCR.
//!
//! Provides MCP tools for text extraction, enabling MCP clients to read
//! images and scanned PDFs through Tesseract.
//!
//! # Tools
//!
//! - `perform_ocr` - Extract text from a single image
//! - `perform_pdf_ocr` - Extract page-labeled text from a PDF
//! - `perform_batch_ocr` - Extract text from several images concurrently
//! - `get_supported_languages` - List installed OCR languages
//!
//! Inputs may be http(s) URLs, file paths, base64 strings, data URIs, or
//! arrays of raw bytes.
//!
//! # Configuration
//!
//! The server reads `SCRIBE_CONFIG` (or `~/.config/scribe/config.toml`)
//! and then environment variables:
//!
//! - `SCRIBE_DEFAULT_LANGUAGE` - Language when a call names none (default: eng)
//! - `SCRIBE_ENGINE_CONFIG` - Default Tesseract config (default: `--oem 3 --psm 6`)
//! - `SCRIBE_BATCH_POLICY` - `best_effort` or `fail_fast`
//! - `SCRIBE_TESSERACT_PATH` - Directory holding the tesseract binary
//!
//! # Usage
//!
//! Add to your `claude_desktop_config.json`:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "scribe": {
//!       "command": "/path/to/scribe-mcp"
//!     }
//!   }
//! }
//! ```

pub mod server;
pub mod tools;

pub use server::{to_mcp_error, OcrServer};
