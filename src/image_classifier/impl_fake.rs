use crate::image_classifier::interface::{ClassifierError, ImageClassifier, Prediction};
use crate::image_tensor::tensor::ImageTensor;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::{Arc, Mutex};

enum Behavior {
    Random,
    Fixed(Vec<Prediction>),
    Failing(String),
}

pub struct ImageClassifierFake {
    behavior: Behavior,
    seen_shapes: Mutex<Vec<[usize; 3]>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::Random, logger)
    }

    #[allow(dead_code)]
    pub fn with_predictions(predictions: Vec<Prediction>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::Fixed(predictions), logger)
    }

    #[allow(dead_code)]
    pub fn failing(message: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::Failing(message.to_string()), logger)
    }

    fn with_behavior(behavior: Behavior, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            behavior,
            seen_shapes: Mutex::new(Vec::new()),
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }

    /// Shapes of every tensor passed to `classify`, oldest first.
    #[allow(dead_code)]
    pub fn seen_shapes(&self) -> Vec<[usize; 3]> {
        self.seen_shapes
            .lock()
            .map(|shapes| shapes.clone())
            .unwrap_or_default()
    }

    fn random_predictions(&self) -> Result<Vec<Prediction>, ClassifierError> {
        let objects = [
            "golden retriever", "tabby cat", "coffee mug", "laptop", "sports car", "bicycle",
            "banana", "wall clock", "potted plant", "water bottle", "computer keyboard",
        ];

        let mut rng = rand::rng();

        let index_dist = Uniform::new(0, objects.len())
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let share_dist =
            Uniform::new(0.0f32, 1.0).map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let first = index_dist.sample(&mut rng);
        let second = (first + 1 + index_dist.sample(&mut rng) % (objects.len() - 1)) % objects.len();

        let top = 0.5 + share_dist.sample(&mut rng) * 0.5;
        let runner_up = (1.0 - top) * share_dist.sample(&mut rng);

        Ok(vec![
            Prediction {
                class_name: objects[first].to_string(),
                probability: top,
            },
            Prediction {
                class_name: objects[second].to_string(),
                probability: runner_up,
            },
        ])
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(&self, tensor: &ImageTensor) -> Result<Vec<Prediction>, ClassifierError> {
        self.logger
            .info(&format!("Classifying tensor {:?}", tensor.shape()))
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        if let Ok(mut shapes) = self.seen_shapes.lock() {
            shapes.push(tensor.shape());
        }

        match &self.behavior {
            Behavior::Random => self.random_predictions(),
            Behavior::Fixed(predictions) => Ok(predictions.clone()),
            Behavior::Failing(message) => Err(ClassifierError::Inference(message.clone())),
        }
    }
}
