use crate::device_camera::interface::{CameraSession, DeviceCamera, Photo};
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Serves existing photos from a folder in name order, one per shutter press.
pub struct DeviceCameraDirectory {
    dir: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraDirectory {
    pub fn new(dir: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            dir,
            logger: logger.with_namespace("camera").with_namespace("directory"),
        }
    }
}

fn is_photo(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("jpg") | Some("jpeg") | Some("png")
    )
}

impl DeviceCamera for DeviceCameraDirectory {
    fn open(&self) -> Result<Box<dyn CameraSession>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger
            .info(&format!("Opening photo folder {}", self.dir.display()))?;

        let mut photos = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && is_photo(&path) {
                photos.push(path);
            }
        }
        photos.sort();

        if photos.is_empty() {
            return Err(format!("no photos found in {}", self.dir.display()).into());
        }

        self.logger
            .info(&format!("Found {} photos", photos.len()))?;

        Ok(Box::new(CameraSessionDirectory {
            photos,
            next: 0,
            logger: self.logger.clone(),
        }))
    }
}

struct CameraSessionDirectory {
    photos: Vec<PathBuf>,
    next: usize,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CameraSession for CameraSessionDirectory {
    fn take_picture(&mut self) -> Result<Photo, Box<dyn std::error::Error + Send + Sync>> {
        let uri = self.photos[self.next % self.photos.len()].clone();
        self.next += 1;

        let (width, height) = image::image_dimensions(&uri)?;
        self.logger
            .info(&format!("Photo taken: {} ({}x{})", uri.display(), width, height))?;

        Ok(Photo {
            uri,
            base64: None,
            width,
            height,
        })
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Photo folder closed")?;
        Ok(())
    }
}
