use crate::config::Config;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    pub labels_path: PathBuf,
    /// (height, width)
    pub input_shape: (u32, u32),
    pub top_k: usize,
    pub load_attempts: u32,
    pub load_retry_delay: Duration,
}

impl From<&Config> for ModelConfig {
    fn from(config: &Config) -> Self {
        Self {
            onnx_model_path: config.model_path.clone(),
            labels_path: config.labels_path.clone(),
            input_shape: (config.target_height, config.target_width),
            top_k: config.top_k,
            load_attempts: config.model_load_attempts,
            load_retry_delay: config.model_load_retry_delay,
        }
    }
}
