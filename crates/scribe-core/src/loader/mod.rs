//! Loaders that turn a classified input into rasters.
//!
//! Byte acquisition is shared: URLs are fetched with a per-load HTTP client,
//! paths are read from disk, base64 is decoded, and byte buffers pass through.
//! Each loader then decodes the bytes into its own raster form.

mod document;
mod image;

pub use document::{DocumentLoader, PdfDocument};
pub use self::image::{decode_image, ImageLoader};

use std::time::Duration;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::{ScribeError, ScribeResult};
use crate::types::RawInput;

/// Default fetch timeout for image URLs.
pub const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default fetch timeout for PDF URLs.
pub const PDF_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Retrieve the raw bytes behind an input.
pub async fn acquire_bytes(input: RawInput, fetch_timeout: Duration) -> ScribeResult<Vec<u8>> {
    match input {
        RawInput::Url(url) => fetch_url(&url, fetch_timeout).await,
        RawInput::Path(path) => tokio::fs::read(&path)
            .await
            .map_err(|e| ScribeError::read(path, e)),
        RawInput::Base64 { payload, .. } => decode_base64(&payload),
        RawInput::Bytes(bytes) => Ok(bytes),
    }
}

async fn fetch_url(url: &url::Url, timeout: Duration) -> ScribeResult<Vec<u8>> {
    tracing::debug!(url = %url, timeout_secs = timeout.as_secs(), "Fetching input");

    // Client lives for this load only.
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ScribeError::fetch(url.as_str(), e.to_string()))?;

    let describe = |e: reqwest::Error| {
        if e.is_timeout() {
            ScribeError::fetch(
                url.as_str(),
                format!("request timed out after {}s", timeout.as_secs()),
            )
        } else {
            ScribeError::fetch(url.as_str(), e.to_string())
        }
    };

    let response = client.get(url.clone()).send().await.map_err(describe)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScribeError::fetch(url.as_str(), format!("HTTP {}", status)));
    }
    let body = response.bytes().await.map_err(describe)?;

    tracing::debug!(url = %url, bytes = body.len(), "Fetched input");
    Ok(body.to_vec())
}

/// Decode base64 text, ignoring embedded whitespace and missing padding.
pub fn decode_base64(payload: &str) -> ScribeResult<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(ScribeError::Decode(
            "input is empty; expected a URL, an existing file path, or base64 data".to_string(),
        ));
    }
    LENIENT_BASE64.decode(compact.as_bytes()).map_err(|e| {
        ScribeError::Decode(format!(
            "input is neither a valid URL, an existing file, nor base64 data ({})",
            e
        ))
    })
}
