use crate::device_permission::interface::{DevicePermission, PermissionStatus};
use crate::library::logger::interface::Logger;
use std::sync::Arc;

pub struct DevicePermissionFake {
    status: Option<PermissionStatus>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DevicePermissionFake {
    pub fn new(status: PermissionStatus, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            status: Some(status),
            logger: logger.with_namespace("permission").with_namespace("fake"),
        }
    }

    /// Every request fails as if the permission service were unreachable.
    pub fn unavailable(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            status: None,
            logger: logger.with_namespace("permission").with_namespace("fake"),
        }
    }
}

impl DevicePermission for DevicePermissionFake {
    fn request_camera(&self) -> Result<PermissionStatus, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Requesting camera permission...")?;
        match self.status {
            Some(status) => {
                self.logger.info(&format!("Camera permission {:?}", status))?;
                Ok(status)
            }
            None => Err("permission service unavailable".into()),
        }
    }
}
