//! Image decoder for various formats
//!
//! Supports PNG, JPEG, GIF, WebP via the image crate.

use std::io::Cursor;

use image::{GenericImageView, ImageFormat as ImgFormat};
use mosaic_canvas::ImageBitmap;

use crate::LoadError;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        if data.len() < 8 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Self::Gif;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    fn to_image_format(self) -> Option<ImgFormat> {
        match self {
            Self::Png => Some(ImgFormat::Png),
            Self::Jpeg => Some(ImgFormat::Jpeg),
            Self::Gif => Some(ImgFormat::Gif),
            Self::WebP => Some(ImgFormat::WebP),
            Self::Unknown => None,
        }
    }
}

/// Image decoder
pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode image bytes into a drawable bitmap
    pub fn decode(data: &[u8]) -> Result<ImageBitmap, LoadError> {
        let format = ImageFormat::from_bytes(data);
        let img_format = format.to_image_format().ok_or(LoadError::UnsupportedFormat)?;

        let img = image::load(Cursor::new(data), img_format)
            .map_err(|e| LoadError::DecodeFailed(e.to_string()))?;

        let (width, height) = img.dimensions();
        let rgba = img.into_rgba8();
        ImageBitmap::from_rgba(width, height, rgba.as_raw()).ok_or(LoadError::EmptyImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImgFormat::Png).unwrap();
        out
    }

    #[test]
    fn test_format_detection_png() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::from_bytes(&png_header), ImageFormat::Png);
    }

    #[test]
    fn test_format_detection_jpeg() {
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(ImageFormat::from_bytes(&jpeg_header), ImageFormat::Jpeg);
    }

    #[test]
    fn test_decode_png() {
        let bitmap = ImageDecoder::decode(&encode_png(3, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.height(), 2);
        assert_eq!(bitmap.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_garbage() {
        assert_eq!(ImageDecoder::decode(b"not an image at all").unwrap_err(), LoadError::UnsupportedFormat);

        let mut truncated = encode_png(4, 4, [0, 0, 0, 255]);
        truncated.truncate(20);
        assert!(matches!(ImageDecoder::decode(&truncated), Err(LoadError::DecodeFailed(_))));
    }
}
