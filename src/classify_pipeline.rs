use crate::config::Config;
use crate::device_camera::interface::Photo;
use crate::image_classifier::interface::{ClassifierError, ImageClassifier, Prediction};
use crate::image_resizer::interface::ImageResizer;
use crate::image_tensor::error::DecodeError;
use crate::image_tensor::tensor::image_to_tensor;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("could not resize photo: {0}")]
    Resize(String),
    #[error("resized image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    UnexpectedSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("could not decode image: {0}")]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error("classification cancelled")]
    Cancelled,
}

/// Tells a running classification whether its capture cycle is still current.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cycle: u64,
    current: Arc<AtomicU64>,
}

impl CancelToken {
    pub fn new(cycle: u64, current: Arc<AtomicU64>) -> Self {
        Self { cycle, current }
    }

    pub fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.cycle
    }

    fn check(&self) -> Result<(), ClassifyError> {
        if self.is_cancelled() {
            Err(ClassifyError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Photo in, top prediction out: resize, decode, strip alpha, classify.
pub struct ClassifyPipeline {
    image_resizer: Arc<dyn ImageResizer + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    target_width: u32,
    target_height: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ClassifyPipeline {
    pub fn new(
        config: &Config,
        image_resizer: Arc<dyn ImageResizer + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            image_resizer,
            image_classifier,
            target_width: config.target_width,
            target_height: config.target_height,
            logger: logger.with_namespace("classify_pipeline"),
        }
    }

    pub fn run(&self, photo: &Photo, cancel: &CancelToken) -> Result<Prediction, ClassifyError> {
        cancel.check()?;

        let resized = self
            .image_resizer
            .resize(&photo.uri, self.target_width, self.target_height)
            .map_err(|e| ClassifyError::Resize(e.to_string()))?;

        if (resized.width, resized.height) != (self.target_width, self.target_height) {
            return Err(ClassifyError::UnexpectedSize {
                expected_width: self.target_width,
                expected_height: self.target_height,
                actual_width: resized.width,
                actual_height: resized.height,
            });
        }
        cancel.check()?;

        let tensor = image_to_tensor(&resized.base64)?;
        let _ = self
            .logger
            .info(&format!("Built tensor {:?} from {}", tensor.shape(), photo.uri.display()));
        cancel.check()?;

        let predictions = self.image_classifier.classify(&tensor)?;
        cancel.check()?;

        let top = predictions
            .into_iter()
            .next()
            .ok_or(ClassifierError::NoPredictions)?;

        if top.class_name.is_empty() || !(0.0..=1.0).contains(&top.probability) {
            return Err(ClassifierError::Inference(format!(
                "model returned an invalid prediction: {:?}",
                top
            ))
            .into());
        }

        let _ = self.logger.info(&format!(
            "Top prediction: {} ({:.3})",
            top.class_name, top.probability
        ));

        Ok(top)
    }
}
