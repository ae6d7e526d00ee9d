use crate::image_tensor::decode::{decode_base64, decode_jpeg};
use crate::image_tensor::error::DecodeError;
use std::fmt;

pub const RGB_CHANNELS: usize = 3;
pub const RGBA_CHANNELS: usize = 4;

/// Pixel data shaped `[height, width, 3]`, channel order RGB.
#[derive(Clone, PartialEq)]
pub struct ImageTensor {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl ImageTensor {
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Result<Self, DecodeError> {
        let expected = byte_len(width, height, RGB_CHANNELS);
        if width == 0 || height == 0 {
            return Err(DecodeError::EmptyImage { width, height });
        }
        if expected != Some(data.len()) {
            return Err(DecodeError::PixelCountMismatch {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }

        Ok(Self {
            width: width as usize,
            height: height as usize,
            data,
        })
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, RGB_CHANNELS]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, y: usize, x: usize, channel: usize) -> Option<u8> {
        if y >= self.height || x >= self.width || channel >= RGB_CHANNELS {
            return None;
        }
        self.data
            .get((y * self.width + x) * RGB_CHANNELS + channel)
            .copied()
    }
}

impl fmt::Debug for ImageTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageTensor")
            .field("shape", &self.shape())
            .field("len", &self.data.len())
            .finish()
    }
}

fn byte_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels))
}

/// Drops the alpha byte of every RGBA pixel. The buffer must hold exactly
/// `width * height` pixels.
pub fn strip_alpha(pixels: &[u8], width: u32, height: u32) -> Result<ImageTensor, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    let expected = byte_len(width, height, RGBA_CHANNELS);
    if expected != Some(pixels.len()) {
        return Err(DecodeError::PixelCountMismatch {
            width,
            height,
            expected: expected.unwrap_or(usize::MAX),
            actual: pixels.len(),
        });
    }

    let mut buffer = Vec::with_capacity(pixels.len() / RGBA_CHANNELS * RGB_CHANNELS);
    for pixel in pixels.chunks_exact(RGBA_CHANNELS) {
        buffer.extend_from_slice(&pixel[..RGB_CHANNELS]);
    }

    ImageTensor::from_rgb(buffer, width, height)
}

/// Base64 JPEG in, `[height, width, 3]` tensor out.
pub fn image_to_tensor(encoded: &str) -> Result<ImageTensor, DecodeError> {
    let bytes = decode_base64(encoded)?;
    let decoded = decode_jpeg(&bytes)?;
    strip_alpha(&decoded.pixels, decoded.width, decoded.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::test_support::jpeg_base64;
    use rand::Rng;

    #[test]
    fn test_strip_alpha_two_by_two() {
        let pixels = vec![
            1, 2, 3, 255, 4, 5, 6, 0, //
            7, 8, 9, 10, 11, 12, 13, 14,
        ];

        let tensor = strip_alpha(&pixels, 2, 2).unwrap();

        assert_eq!(tensor.shape(), [2, 2, 3]);
        assert_eq!(
            tensor.as_slice(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 12, 13]
        );
        assert_eq!(tensor.get(1, 1, 2), Some(13));
        assert_eq!(tensor.get(2, 0, 0), None);
    }

    #[test]
    fn test_strip_alpha_keeps_rgb_at_same_pixel_index() {
        let mut rng = rand::rng();
        let (width, height) = (37u32, 11u32);
        let pixels: Vec<u8> = (0..width * height * 4).map(|_| rng.random()).collect();

        let tensor = strip_alpha(&pixels, width, height).unwrap();
        let output = tensor.as_slice();

        assert_eq!(output.len(), (width * height * 3) as usize);
        for i in 0..(width * height) as usize {
            assert_eq!(output[3 * i..3 * i + 3], pixels[4 * i..4 * i + 3]);
        }
    }

    #[test]
    fn test_strip_alpha_short_buffer() {
        let pixels = vec![0u8; 2 * 2 * 4 - 1];

        let result = strip_alpha(&pixels, 2, 2);

        match result {
            Err(DecodeError::PixelCountMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_strip_alpha_long_buffer() {
        let pixels = vec![0u8; 2 * 2 * 4 + 4];

        assert!(matches!(
            strip_alpha(&pixels, 2, 2),
            Err(DecodeError::PixelCountMismatch { .. })
        ));
    }

    #[test]
    fn test_strip_alpha_empty_image() {
        assert!(matches!(
            strip_alpha(&[], 0, 5),
            Err(DecodeError::EmptyImage {
                width: 0,
                height: 5
            })
        ));
    }

    #[test]
    fn test_image_to_tensor_model_input_size() {
        let tensor = image_to_tensor(&jpeg_base64(224, 224)).unwrap();

        assert_eq!(tensor.shape(), [224, 224, 3]);
        assert_eq!(tensor.len(), 224 * 224 * 3);
    }

    #[test]
    fn test_image_to_tensor_rectangle_is_height_first() {
        let tensor = image_to_tensor(&jpeg_base64(31, 17)).unwrap();

        assert_eq!(tensor.shape(), [17, 31, 3]);
        assert_eq!(tensor.len(), 31 * 17 * 3);
    }

    #[test]
    fn test_image_to_tensor_corrupted_base64() {
        let result = image_to_tensor("%%%not base64%%%");

        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_image_to_tensor_valid_base64_but_not_jpeg() {
        let result = image_to_tensor("aGVsbG8gd29ybGQ=");

        assert!(matches!(result, Err(DecodeError::Jpeg(_))));
    }

    #[test]
    fn test_from_rgb_checks_length() {
        assert!(ImageTensor::from_rgb(vec![0; 12], 2, 2).is_ok());
        assert!(ImageTensor::from_rgb(vec![0; 11], 2, 2).is_err());
    }
}
