//! Decoded raster image in a fixed channel order.

use image::{DynamicImage, RgbImage};

use crate::error::{ScribeError, ScribeResult};

/// A decoded 3-channel, 8-bit RGB raster.
///
/// Never zero-sized: a decode that produces no pixels is a [`ScribeError::Format`].
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pixels: RgbImage,
}

impl NormalizedImage {
    /// Number of channels per pixel.
    pub const CHANNELS: u8 = 3;

    /// Wrap an RGB buffer, rejecting empty images.
    pub fn new(pixels: RgbImage) -> ScribeResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ScribeError::format(format!(
                "decoded image is empty ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { pixels })
    }

    /// Convert any decoded image into the normalized channel order.
    pub fn from_dynamic(image: DynamicImage) -> ScribeResult<Self> {
        Self::new(image.to_rgb8())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the pixel buffer.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Copy into a [`DynamicImage`] for backends that want one.
    pub fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::ImageRgb8(self.pixels.clone())
    }

    pub fn into_inner(self) -> RgbImage {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_rejects_empty_image() {
        let err = NormalizedImage::new(RgbImage::new(0, 10)).unwrap_err();
        assert!(matches!(err, ScribeError::Format(_)));
    }

    #[test]
    fn test_from_dynamic_converts_to_rgb() {
        let gray = GrayImage::from_pixel(4, 2, Luma([200]));
        let image = NormalizedImage::from_dynamic(DynamicImage::ImageLuma8(gray)).unwrap();
        assert_eq!((image.width(), image.height()), (4, 2));
        assert_eq!(image.pixels().get_pixel(0, 0).0, [200, 200, 200]);
    }
}
