use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("jpeg decoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
    #[error("decoded image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("pixel buffer has {actual} bytes, expected {expected} for a {width}x{height} image")]
    PixelCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
