//! Image loading: acquire bytes, then decode into a [`NormalizedImage`].

use std::time::Duration;

use crate::error::{ScribeError, ScribeResult};
use crate::types::{NormalizedImage, RawInput};

use super::{acquire_bytes, IMAGE_FETCH_TIMEOUT};

/// Loads single images from any input kind.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    fetch_timeout: Duration,
}

impl ImageLoader {
    /// Create an image loader with a custom URL fetch timeout.
    pub fn new(fetch_timeout: Duration) -> Self {
        Self { fetch_timeout }
    }

    /// Acquire and decode an image.
    ///
    /// Transport failures surface as `Fetch`/`Read`/`Decode`; bytes that arrive
    /// but are not an image surface as `Format`.
    pub async fn load(&self, input: RawInput) -> ScribeResult<NormalizedImage> {
        let source = input.describe();
        let bytes = acquire_bytes(input, self.fetch_timeout).await?;
        let image = decode_image(bytes).await?;
        tracing::debug!(
            source = %source,
            width = image.width(),
            height = image.height(),
            "Loaded image"
        );
        Ok(image)
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(IMAGE_FETCH_TIMEOUT)
    }
}

/// Decode encoded image bytes on a blocking thread.
pub async fn decode_image(bytes: Vec<u8>) -> ScribeResult<NormalizedImage> {
    tokio::task::spawn_blocking(move || {
        let format = image::guess_format(&bytes)
            .map_err(|_| ScribeError::format("unrecognized image format"))?;
        let decoded = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| ScribeError::format(format!("{:?} data is corrupt: {}", format, e)))?;
        NormalizedImage::from_dynamic(decoded)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[tokio::test]
    async fn test_load_png_bytes() {
        let image = ImageLoader::default()
            .load(RawInput::Bytes(png_bytes(20, 10)))
            .await
            .unwrap();
        assert_eq!((image.width(), image.height()), (20, 10));
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_format_error() {
        let err = ImageLoader::default()
            .load(RawInput::Bytes(b"invalid image data".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::Format(_)));
    }

    #[tokio::test]
    async fn test_truncated_png_is_format_error() {
        let mut bytes = png_bytes(20, 10);
        bytes.truncate(40);
        let err = decode_image(bytes).await.unwrap_err();
        assert!(matches!(err, ScribeError::Format(_)));
    }

    #[tokio::test]
    async fn test_malformed_base64_is_decode_error() {
        let err = ImageLoader::default()
            .load(RawInput::Base64 {
                payload: "%%%".to_string(),
                mime_type: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::Decode(_)));
    }
}
