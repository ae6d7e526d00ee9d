use crate::device_camera::interface::{CameraSession, DeviceCamera, Photo};
use crate::library::logger::interface::Logger;
use chrono::Utc;
use image::{ImageFormat, Rgb, RgbImage};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Renders a synthetic frame and writes it as a JPEG capture artifact. Only the
/// latest capture is kept on disk.
pub struct DeviceCameraFake {
    capture_dir: PathBuf,
    last_capture: Arc<Mutex<Option<PathBuf>>>,
    width: u32,
    height: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFake {
    pub fn new(capture_dir: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            capture_dir,
            last_capture: Arc::new(Mutex::new(None)),
            width: 640,
            height: 480,
            logger: logger.with_namespace("camera").with_namespace("fake"),
        }
    }

    #[allow(dead_code)]
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(&self) -> Result<Box<dyn CameraSession>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Starting camera...")?;
        std::fs::create_dir_all(&self.capture_dir)?;
        self.logger.info("Camera started")?;

        Ok(Box::new(CameraSessionFake {
            capture_dir: self.capture_dir.clone(),
            last_capture: Arc::clone(&self.last_capture),
            width: self.width,
            height: self.height,
            frame: 0,
            logger: self.logger.clone(),
        }))
    }
}

struct CameraSessionFake {
    capture_dir: PathBuf,
    last_capture: Arc<Mutex<Option<PathBuf>>>,
    width: u32,
    height: u32,
    frame: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CameraSessionFake {
    fn replace_last_capture(
        &self,
        uri: &std::path::Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut last = self
            .last_capture
            .lock()
            .map_err(|_| "capture lock poisoned")?;
        if let Some(previous) = last.replace(uri.to_path_buf()) {
            if let Err(e) = std::fs::remove_file(&previous) {
                self.logger.error(&format!(
                    "Could not remove {}: {}",
                    previous.display(),
                    e
                ))?;
            }
        }
        Ok(())
    }
}

impl CameraSession for CameraSessionFake {
    fn take_picture(&mut self) -> Result<Photo, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Capturing photo...")?;
        self.frame += 1;

        let shift = self.frame * 40;
        let (width, height) = (self.width, self.height);
        let frame = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 255 / width.max(1) + shift) % 256) as u8,
                ((y * 255 / height.max(1) + shift / 2) % 256) as u8,
                (shift % 256) as u8,
            ])
        });

        let uri = self.capture_dir.join(format!(
            "capture-{}-{}.jpg",
            Utc::now().format("%Y%m%d%H%M%S%3f"),
            self.frame
        ));
        frame.save_with_format(&uri, ImageFormat::Jpeg)?;
        self.replace_last_capture(&uri)?;

        self.logger
            .info(&format!("Photo captured: {}", uri.display()))?;

        Ok(Photo {
            uri,
            base64: None,
            width,
            height,
        })
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Camera stopped")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use crate::library::test_support::unique_temp_dir;

    #[test]
    fn test_take_picture_writes_jpeg() {
        let dir = unique_temp_dir("camera-fake");
        let camera =
            DeviceCameraFake::new(dir.clone(), Arc::new(LoggerFake::new())).with_resolution(64, 48);

        let mut session = camera.open().unwrap();
        let first = session.take_picture().unwrap();
        let second = session.take_picture().unwrap();
        session.close().unwrap();

        assert_ne!(first.uri, second.uri);
        assert_eq!((second.width, second.height), (64, 48));
        assert_eq!(image::image_dimensions(&second.uri).unwrap(), (64, 48));
        assert!(second.uri.starts_with(&dir));
    }

    #[test]
    fn test_next_capture_discards_previous_file() {
        let dir = unique_temp_dir("camera-fake-discard");
        let camera =
            DeviceCameraFake::new(dir.clone(), Arc::new(LoggerFake::new())).with_resolution(32, 24);

        let mut session = camera.open().unwrap();
        let first = session.take_picture().unwrap();
        session.close().unwrap();

        let mut session = camera.open().unwrap();
        let second = session.take_picture().unwrap();
        session.close().unwrap();

        assert!(!first.uri.exists());
        assert!(second.uri.exists());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }
}
