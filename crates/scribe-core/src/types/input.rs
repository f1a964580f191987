//! Input values as they arrive at the tool boundary, and their classified form.

use std::path::PathBuf;

/// An unclassified input value: either text or a raw byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValue {
    /// URL, filesystem path, bare base64, or data URI.
    Text(String),
    /// Raw file contents.
    Bytes(Vec<u8>),
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for InputValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for InputValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// A classified input, produced once by [`crate::classify`] and consumed by the loaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// Remote http(s) resource.
    Url(url::Url),
    /// Existing filesystem path.
    Path(PathBuf),
    /// Base64 text with any data-URI prefix already stripped.
    Base64 {
        payload: String,
        /// MIME type declared by a data-URI prefix, if there was one.
        mime_type: Option<String>,
    },
    /// Raw bytes passed straight through.
    Bytes(Vec<u8>),
}

impl RawInput {
    /// Short name of the input kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RawInput::Url(_) => "url",
            RawInput::Path(_) => "path",
            RawInput::Base64 { .. } => "base64",
            RawInput::Bytes(_) => "bytes",
        }
    }

    /// Human-readable description that never dumps payloads.
    pub fn describe(&self) -> String {
        match self {
            RawInput::Url(url) => url.to_string(),
            RawInput::Path(path) => path.display().to_string(),
            RawInput::Base64 { payload, mime_type } => match mime_type {
                Some(mime) => format!("{} base64 ({} chars)", mime, payload.len()),
                None => format!("base64 ({} chars)", payload.len()),
            },
            RawInput::Bytes(bytes) => format!("{} bytes", bytes.len()),
        }
    }
}
