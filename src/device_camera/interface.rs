use std::fmt;
use std::path::PathBuf;

/// One captured photo. `uri` points at the capture artifact on disk.
#[derive(Clone, PartialEq)]
pub struct Photo {
    pub uri: PathBuf,
    pub base64: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("uri", &self.uri)
            .field(
                "base64",
                &self.base64.as_ref().map(|b| format!("<{} chars>", b.len())),
            )
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// A live camera. Exists only while the camera view is active; closing it
/// releases the hardware.
pub trait CameraSession: Send {
    fn take_picture(&mut self) -> Result<Photo, Box<dyn std::error::Error + Send + Sync>>;
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub trait DeviceCamera {
    fn open(&self) -> Result<Box<dyn CameraSession>, Box<dyn std::error::Error + Send + Sync>>;
}
