use crate::image_tensor::error::DecodeError;
use base64::Engine;
use image::ImageFormat;

/// Row-major RGBA pixels, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(base64::engine::general_purpose::STANDARD.decode(encoded.trim())?)
}

pub fn decode_jpeg(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::test_support::jpeg_bytes;

    #[test]
    fn test_decode_jpeg_is_rgba() {
        let decoded = decode_jpeg(&jpeg_bytes(12, 7)).unwrap();

        assert_eq!((decoded.width, decoded.height), (12, 7));
        assert_eq!(decoded.pixels.len(), 12 * 7 * 4);
        assert!(decoded.pixels.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_decode_base64_ignores_surrounding_whitespace() {
        let bytes = decode_base64("  aGVsbG8=\n").unwrap();

        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_jpeg_rejects_png() {
        let mut png = Vec::new();
        image::RgbImage::new(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        assert!(matches!(decode_jpeg(&png), Err(DecodeError::Jpeg(_))));
    }
}
