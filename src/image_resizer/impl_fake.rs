use crate::image_resizer::interface::{ImageResizer, ResizedImage};
use std::path::Path;

/// Hands back a fixed result regardless of input.
pub struct ImageResizerFake {
    result: Result<ResizedImage, String>,
}

impl ImageResizerFake {
    pub fn returning(base64: String, width: u32, height: u32) -> Self {
        Self {
            result: Ok(ResizedImage {
                width,
                height,
                base64,
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

impl ImageResizer for ImageResizerFake {
    fn resize(
        &self,
        _uri: &Path,
        _width: u32,
        _height: u32,
    ) -> Result<ResizedImage, Box<dyn std::error::Error + Send + Sync>> {
        self.result.clone().map_err(|message| message.into())
    }
}
