//! Error types for scribe operations.
//!
//! Every failure in the input-resolution and dispatch pipeline is one of the
//! variants below. Each variant carries a stable error code and falls into one
//! of two kinds, which the tool layer maps onto protocol error kinds.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for scribe operations.
pub type ScribeResult<T> = Result<T, ScribeError>;

/// Main error type for all scribe operations.
#[derive(Error, Debug)]
pub enum ScribeError {
    /// Input value has an unusable shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested language is not installed in the OCR backend.
    #[error("Unsupported language: {requested}. Available languages: {}", available.join(", "))]
    UnsupportedLanguage {
        requested: String,
        available: Vec<String>,
    },

    /// Engine configuration string could not be parsed.
    #[error("Invalid engine config '{config}': {message}")]
    InvalidEngineConfig { config: String, message: String },

    /// Remote fetch failed (network, timeout, or non-2xx status).
    #[error("Failed to fetch from URL {url}: {message}")]
    Fetch { url: String, message: String },

    /// Local file could not be read.
    #[error("Failed to read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Base64 payload is malformed.
    #[error("Invalid input: {0}")]
    Decode(String),

    /// Bytes were retrieved but are not a recognizable image.
    #[error("Failed to decode image data: {0}")]
    Format(String),

    /// PDF rasterizer rejected the payload.
    #[error("Failed to rasterize PDF: {0}")]
    Rasterize(String),

    /// OCR backend call failed.
    #[error("OCR processing failed: {0}")]
    Recognition(String),

    /// OCR backend returned only whitespace.
    #[error("No text detected in image")]
    EmptyResult,

    /// OCR backend capability query failed.
    #[error("OCR backend error: {0}")]
    Backend(String),

    /// OCR backend binary is missing or unusable.
    #[error("OCR backend unavailable: {message}")]
    BackendUnavailable {
        message: String,
        install_hint: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Protocol-level classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The caller sent something unusable.
    InvalidParams,
    /// Something failed while serving a valid request.
    Internal,
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Input (INPUT_xxx)
    InputInvalid,
    InputUndecodable,

    // Parameters (PARAM_xxx)
    ParamUnsupportedLanguage,
    ParamEngineConfig,

    // Acquisition (NET_xxx, FS_xxx)
    NetFetchFailed,
    FsReadFailed,

    // Decoding (IMG_xxx, PDF_xxx)
    ImgFormat,
    PdfRasterize,

    // Backend (OCR_xxx)
    OcrRecognitionFailed,
    OcrEmptyResult,
    OcrBackendFailed,
    OcrBackendUnavailable,

    // Configuration
    Configuration,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InputInvalid => "INPUT_001",
            ErrorCode::InputUndecodable => "INPUT_002",
            ErrorCode::ParamUnsupportedLanguage => "PARAM_001",
            ErrorCode::ParamEngineConfig => "PARAM_002",
            ErrorCode::NetFetchFailed => "NET_001",
            ErrorCode::FsReadFailed => "FS_001",
            ErrorCode::ImgFormat => "IMG_001",
            ErrorCode::PdfRasterize => "PDF_001",
            ErrorCode::OcrRecognitionFailed => "OCR_001",
            ErrorCode::OcrEmptyResult => "OCR_002",
            ErrorCode::OcrBackendFailed => "OCR_003",
            ErrorCode::OcrBackendUnavailable => "OCR_004",
            ErrorCode::Configuration => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl ScribeError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an unsupported language error listing the current set.
    pub fn unsupported_language(requested: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnsupportedLanguage {
            requested: requested.into(),
            available,
        }
    }

    /// Create a fetch error.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a read error for a path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Create a rasterize error.
    pub fn rasterize(message: impl Into<String>) -> Self {
        Self::Rasterize(message.into())
    }

    /// Create a recognition error.
    pub fn recognition(message: impl Into<String>) -> Self {
        Self::Recognition(message.into())
    }

    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Get the protocol-level kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_)
            | Self::UnsupportedLanguage { .. }
            | Self::InvalidEngineConfig { .. }
            | Self::Decode(_) => ErrorKind::InvalidParams,
            _ => ErrorKind::Internal,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InputInvalid,
            Self::Decode(_) => ErrorCode::InputUndecodable,
            Self::UnsupportedLanguage { .. } => ErrorCode::ParamUnsupportedLanguage,
            Self::InvalidEngineConfig { .. } => ErrorCode::ParamEngineConfig,
            Self::Fetch { .. } => ErrorCode::NetFetchFailed,
            Self::Read { .. } => ErrorCode::FsReadFailed,
            Self::Format(_) => ErrorCode::ImgFormat,
            Self::Rasterize(_) => ErrorCode::PdfRasterize,
            Self::Recognition(_) => ErrorCode::OcrRecognitionFailed,
            Self::EmptyResult => ErrorCode::OcrEmptyResult,
            Self::Backend(_) => ErrorCode::OcrBackendFailed,
            Self::BackendUnavailable { .. } => ErrorCode::OcrBackendUnavailable,
            Self::Configuration(_) => ErrorCode::Configuration,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::UnsupportedLanguage { .. } => {
                Some("Install the matching Tesseract language pack or pick an available language")
            }
            Self::Decode(_) => Some("Pass an http(s) URL, an existing file path, or base64 data"),
            Self::Format(_) => Some("Supported image formats are PNG, JPEG, GIF, WebP, BMP and TIFF"),
            Self::EmptyResult => Some("Check that the image contains legible text or try another --psm mode"),
            Self::BackendUnavailable { install_hint, .. } => install_hint.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_language_lists_available() {
        let err = ScribeError::unsupported_language(
            "xx_invalid",
            vec!["eng".to_string(), "deu".to_string()],
        );
        assert_eq!(err.kind(), ErrorKind::InvalidParams);
        assert_eq!(
            err.to_string(),
            "Unsupported language: xx_invalid. Available languages: eng, deu"
        );
    }

    #[test]
    fn test_transport_and_decode_errors_are_internal() {
        assert_eq!(
            ScribeError::fetch("https://x.test/a.png", "HTTP 404").kind(),
            ErrorKind::Internal
        );
        assert_eq!(ScribeError::format("bad").kind(), ErrorKind::Internal);
        assert_eq!(ScribeError::EmptyResult.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_undecodable_input_is_invalid_params() {
        let err = ScribeError::Decode("not base64".to_string());
        assert_eq!(err.kind(), ErrorKind::InvalidParams);
        assert_eq!(err.code(), ErrorCode::InputUndecodable);
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::NetFetchFailed.as_str(), "NET_001");
        assert_eq!(ErrorCode::OcrEmptyResult.as_str(), "OCR_002");
        assert_eq!(ErrorKind::InvalidParams.to_string(), "invalid_params");
    }
}
