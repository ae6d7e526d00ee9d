#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

pub trait DevicePermission {
    fn request_camera(&self) -> Result<PermissionStatus, Box<dyn std::error::Error + Send + Sync>>;
}
