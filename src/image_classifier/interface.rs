use crate::image_tensor::tensor::ImageTensor;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_name: String,
    pub probability: f32,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("model returned no predictions")]
    NoPredictions,
}

pub trait ImageClassifier {
    /// Predictions ordered by descending probability.
    fn classify(&self, tensor: &ImageTensor) -> Result<Vec<Prediction>, ClassifierError>;
}
