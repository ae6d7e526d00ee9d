use crate::image_classifier::interface::{ClassifierError, ImageClassifier, Prediction};
use crate::image_classifier::labels::Labels;
use crate::image_classifier::model_cache::ModelCache;
use crate::image_classifier::model_config::ModelConfig;
use crate::image_classifier::ranking::rank;
use crate::image_classifier::tract::input::image_tensor_to_input;
use crate::image_tensor::tensor::ImageTensor;
use crate::library::logger::interface::Logger;
use std::sync::Arc;
use tract_onnx::prelude::*;

struct LoadedModel {
    plan: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    labels: Labels,
}

/// MobileNet-style ONNX classifier. The model is loaded on first use and then
/// shared by every call; construct one instance per process.
pub struct ImageClassifierTractOnnx {
    config: ModelConfig,
    model: ModelCache<LoadedModel>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            model: ModelCache::new(config.load_attempts, config.load_retry_delay),
            config,
            logger: logger.with_namespace("image_classifier").with_namespace("tract_onnx"),
        }
    }

    fn load(&self) -> Result<LoadedModel, Box<dyn std::error::Error + Send + Sync>> {
        let (height, width) = self.config.input_shape;

        self.logger.info(&format!(
            "Loading model {}",
            self.config.onnx_model_path.display()
        ))?;

        let plan = tract_onnx::onnx()
            .model_for_path(&self.config.onnx_model_path)?
            .with_input_fact(0, f32::fact([1, 3, height as usize, width as usize]).into())?
            .into_optimized()?
            .into_runnable()?;

        let labels = Labels::parse(&std::fs::read_to_string(&self.config.labels_path)?);

        self.logger
            .info(&format!("Model loaded with {} labels", labels.len()))?;

        Ok(LoadedModel { plan, labels })
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(&self, tensor: &ImageTensor) -> Result<Vec<Prediction>, ClassifierError> {
        let (height, width) = self.config.input_shape;
        if tensor.shape() != [height as usize, width as usize, 3] {
            return Err(ClassifierError::Inference(format!(
                "expected a {}x{} image, got shape {:?}",
                width,
                height,
                tensor.shape()
            )));
        }

        let model = self.model.get_or_load(|| self.load()).map_err(|e| {
            let _ = self.logger.error(&e.to_string());
            e
        })?;

        let input = image_tensor_to_input(tensor);
        let outputs = model
            .plan
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let output = outputs.first().ok_or(ClassifierError::NoPredictions)?;
        let scores: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?
            .iter()
            .copied()
            .collect();

        let predictions = rank(&scores, &model.labels, self.config.top_k);
        if predictions.is_empty() {
            return Err(ClassifierError::NoPredictions);
        }

        let _ = self
            .logger
            .info(&format!("Predictions: {:?}", predictions));

        Ok(predictions)
    }
}
