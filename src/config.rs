use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiKind {
    Console,
    Gui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    Grant,
    Deny,
    /// Ask the OS by opening the video device node.
    Device,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Fake,
    Onnx,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target_width: u32,
    pub target_height: u32,
    pub jpeg_quality: u8,
    pub top_k: usize,
    pub model_load_attempts: u32,
    pub model_load_retry_delay: Duration,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub photos_dir: Option<PathBuf>,
    pub capture_dir: PathBuf,
    pub video_device: PathBuf,
    pub ui: UiKind,
    pub permission: PermissionMode,
    pub classifier: ClassifierKind,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_width: 224,
            target_height: 224,
            jpeg_quality: 75,
            top_k: 3,
            model_load_attempts: 3,
            model_load_retry_delay: Duration::from_millis(500),
            model_path: PathBuf::from("models/mobilenetv2-7.onnx"),
            labels_path: PathBuf::from("models/imagenet_labels.txt"),
            photos_dir: None,
            capture_dir: std::env::temp_dir().join("snap-classify"),
            video_device: PathBuf::from("/dev/video0"),
            ui: UiKind::Gui,
            permission: PermissionMode::Grant,
            classifier: ClassifierKind::Onnx,
            logger_timezone: chrono::Utc.fix(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("SNAP_CLASSIFY_MODEL") {
            config.model_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_LABELS") {
            config.labels_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_PHOTOS") {
            config.photos_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_CAPTURE_DIR") {
            config.capture_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_VIDEO_DEVICE") {
            config.video_device = PathBuf::from(value);
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_UI") {
            config.ui = match value.to_lowercase().as_str() {
                "console" => UiKind::Console,
                "gui" => UiKind::Gui,
                _ => return Err(invalid("SNAP_CLASSIFY_UI", value)),
            };
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_PERMISSION") {
            config.permission = match value.to_lowercase().as_str() {
                "grant" => PermissionMode::Grant,
                "deny" => PermissionMode::Deny,
                "device" => PermissionMode::Device,
                _ => return Err(invalid("SNAP_CLASSIFY_PERMISSION", value)),
            };
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_CLASSIFIER") {
            config.classifier = match value.to_lowercase().as_str() {
                "fake" => ClassifierKind::Fake,
                "onnx" => ClassifierKind::Onnx,
                _ => return Err(invalid("SNAP_CLASSIFY_CLASSIFIER", value)),
            };
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_TOP_K") {
            config.top_k = match value.parse::<usize>() {
                Ok(top_k) if top_k > 0 => top_k,
                _ => return Err(invalid("SNAP_CLASSIFY_TOP_K", value)),
            };
        }
        if let Some(value) = lookup("SNAP_CLASSIFY_UTC_OFFSET_HOURS") {
            config.logger_timezone = value
                .parse::<i32>()
                .ok()
                .and_then(|hours| chrono::FixedOffset::east_opt(hours * 3600))
                .ok_or_else(|| invalid("SNAP_CLASSIFY_UTC_OFFSET_HOURS", value))?;
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { key, value }
}
