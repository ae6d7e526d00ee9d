use crate::device_permission::interface::{DevicePermission, PermissionStatus};
use crate::library::logger::interface::Logger;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

/// Camera access on a desktop is governed by the permissions of the video
/// device node, so opening it for reading answers the permission question.
pub struct DevicePermissionVideoNode {
    device_path: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DevicePermissionVideoNode {
    pub fn new(device_path: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            device_path,
            logger: logger.with_namespace("permission").with_namespace("video_node"),
        }
    }
}

impl DevicePermission for DevicePermissionVideoNode {
    fn request_camera(&self) -> Result<PermissionStatus, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "Checking access to {}",
            self.device_path.display()
        ))?;

        match std::fs::File::open(&self.device_path) {
            Ok(_) => Ok(PermissionStatus::Granted),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                self.logger.info("Camera access denied by the OS")?;
                Ok(PermissionStatus::Denied)
            }
            Err(e) => Err(format!(
                "camera device {} unavailable: {}",
                self.device_path.display(),
                e
            )
            .into()),
        }
    }
}
