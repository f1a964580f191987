//! Input classification.
//!
//! Turns an opaque input value into a [`RawInput`]. Classification never
//! fails: text that is neither an http(s) URL nor an existing path is assumed
//! to be base64 and left for the loader to reject.

use std::path::PathBuf;

use crate::types::{InputValue, RawInput};

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Classify an input value. First match wins: URL, existing path, base64.
pub fn classify(input: impl Into<InputValue>) -> RawInput {
    match input.into() {
        InputValue::Text(text) => classify_text(&text),
        InputValue::Bytes(bytes) => RawInput::Bytes(bytes),
    }
}

/// Classify a text input.
pub fn classify_text(text: &str) -> RawInput {
    let trimmed = text.trim();

    if let Ok(url) = url::Url::parse(trimmed) {
        if matches!(url.scheme(), "http" | "https") {
            tracing::debug!(url = %url, "Classified input as URL");
            return RawInput::Url(url);
        }
    }

    // File names may legitimately start or end with spaces.
    if let Some(path) = existing_path(text).or_else(|| existing_path(trimmed)) {
        tracing::debug!(path = %path.display(), "Classified input as path");
        return RawInput::Path(path);
    }

    let (mime_type, payload) = match strip_data_uri(trimmed) {
        Some((mime, payload)) => (Some(mime), payload),
        None => (None, trimmed),
    };
    tracing::debug!(
        mime_type = mime_type.as_deref().unwrap_or("unknown"),
        chars = payload.len(),
        "Classified input as base64"
    );
    RawInput::Base64 {
        payload: payload.to_string(),
        mime_type,
    }
}

fn existing_path(text: &str) -> Option<PathBuf> {
    if text.is_empty() {
        return None;
    }
    let path = match text.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()?.join(rest),
        None => PathBuf::from(text),
    };
    path.exists().then_some(path)
}

/// Split `data:<mime>;base64,<payload>` for image and PDF MIME types.
fn strip_data_uri(text: &str) -> Option<(String, &str)> {
    let scheme = text.get(..DATA_URI_SCHEME.len())?;
    if !scheme.eq_ignore_ascii_case(DATA_URI_SCHEME) {
        return None;
    }
    let rest = &text[DATA_URI_SCHEME.len()..];
    let marker = rest.to_ascii_lowercase().find(BASE64_MARKER)?;
    let mime = rest[..marker].to_ascii_lowercase();
    if mime.starts_with("image/") || mime == "application/pdf" {
        Some((mime, &rest[marker + BASE64_MARKER.len()..]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_http_and_https_are_urls() {
        assert!(matches!(
            classify("https://example.com/scan.png"),
            RawInput::Url(_)
        ));
        assert!(matches!(
            classify("  http://example.com/a.jpg "),
            RawInput::Url(_)
        ));
    }

    #[test]
    fn test_other_schemes_never_classify_as_url() {
        for input in ["ftp://example.com/a.png", "file:///tmp/a.png", "mailto:a@b.c"] {
            assert!(
                !matches!(classify(input), RawInput::Url(_)),
                "{} classified as URL",
                input
            );
        }
    }

    #[test]
    fn test_existing_file_is_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really an image").unwrap();
        let text = file.path().to_string_lossy().to_string();

        assert_eq!(classify(text.as_str()), RawInput::Path(file.path().to_path_buf()));
    }

    #[test]
    fn test_path_with_surrounding_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(" scan.png ");
        std::fs::write(&path, b"not really an image").unwrap();
        let text = path.to_string_lossy().to_string();

        assert_eq!(classify(text.as_str()), RawInput::Path(path));
    }

    #[test]
    fn test_padded_existing_path_is_still_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let text = format!("  {}\n", file.path().display());

        assert_eq!(classify(text), RawInput::Path(file.path().to_path_buf()));
    }

    #[test]
    fn test_missing_path_falls_through_to_base64() {
        let raw = classify("/definitely/not/here.png");
        assert!(matches!(raw, RawInput::Base64 { mime_type: None, .. }));
    }

    #[test]
    fn test_data_uri_prefix_is_stripped() {
        let raw = classify("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(
            raw,
            RawInput::Base64 {
                payload: "iVBORw0KGgo=".to_string(),
                mime_type: Some("image/png".to_string()),
            }
        );

        let raw = classify("DATA:Application/PDF;BASE64,JVBERi0=");
        assert_eq!(
            raw,
            RawInput::Base64 {
                payload: "JVBERi0=".to_string(),
                mime_type: Some("application/pdf".to_string()),
            }
        );
    }

    #[test]
    fn test_unrelated_data_uri_is_kept_whole() {
        let raw = classify("data:text/plain;base64,aGVsbG8=");
        assert!(matches!(
            raw,
            RawInput::Base64 { ref payload, mime_type: None } if payload.starts_with("data:")
        ));
    }

    #[test]
    fn test_bytes_pass_through() {
        let raw = classify(vec![0x89u8, 0x50, 0x4E, 0x47]);
        assert_eq!(raw, RawInput::Bytes(vec![0x89, 0x50, 0x4E, 0x47]));
    }
}
