use crate::image_resizer::interface::{ImageResizer, ResizedImage};
use crate::library::logger::interface::Logger;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::path::Path;
use std::sync::Arc;

pub struct ImageResizerJpeg {
    quality: u8,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageResizerJpeg {
    pub fn new(quality: u8, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            logger: logger.with_namespace("image_resizer"),
        }
    }
}

impl ImageResizer for ImageResizerJpeg {
    fn resize(
        &self,
        uri: &Path,
        width: u32,
        height: u32,
    ) -> Result<ResizedImage, Box<dyn std::error::Error + Send + Sync>> {
        if width == 0 || height == 0 {
            return Err(format!("invalid target size {}x{}", width, height).into());
        }

        self.logger.info(&format!(
            "Resizing {} to {}x{}",
            uri.display(),
            width,
            height
        ))?;

        let image = image::open(uri)?;
        let resized = image
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgb8();

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.quality).encode_image(&resized)?;

        let (width, height) = resized.dimensions();

        Ok(ResizedImage {
            width,
            height,
            base64: base64::engine::general_purpose::STANDARD.encode(&encoded),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_tensor::decode::{decode_base64, decode_jpeg};
    use crate::library::logger::impl_fake::LoggerFake;
    use crate::library::test_support::{unique_temp_dir, write_jpeg};

    fn resizer() -> ImageResizerJpeg {
        ImageResizerJpeg::new(75, Arc::new(LoggerFake::new()))
    }

    #[test]
    fn test_resize_landscape_to_model_input() {
        let dir = unique_temp_dir("resizer-landscape");
        let photo = write_jpeg(&dir, "photo.jpg", 640, 480);

        let resized = resizer().resize(&photo, 224, 224).unwrap();

        assert_eq!((resized.width, resized.height), (224, 224));
        let decoded = decode_jpeg(&decode_base64(&resized.base64).unwrap()).unwrap();
        assert_eq!((decoded.width, decoded.height), (224, 224));
    }

    #[test]
    fn test_resize_portrait_ignores_aspect_ratio() {
        let dir = unique_temp_dir("resizer-portrait");
        let photo = write_jpeg(&dir, "tall.jpg", 90, 300);

        let resized = resizer().resize(&photo, 224, 224).unwrap();

        assert_eq!((resized.width, resized.height), (224, 224));
    }

    #[test]
    fn test_resize_missing_file() {
        let dir = unique_temp_dir("resizer-missing");

        let result = resizer().resize(&dir.join("nope.jpg"), 224, 224);

        assert!(result.is_err());
    }

    #[test]
    fn test_resize_leaves_no_files_behind() {
        let dir = unique_temp_dir("resizer-no-files");
        let photo = write_jpeg(&dir, "photo.jpg", 100, 100);

        resizer().resize(&photo, 224, 224).unwrap();

        let entries: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(entries, vec![photo]);
    }
}
