use super::{
    Classifier, OnnxClassifier, Preprocessor,
    types::{ClassLabels, Prediction},
};
use crate::{Result, config::ModelConfig};
use tracing::{error, info};

/// Preprocessing, inference and label lookup for a single upload.
pub struct Predictor {
    classifier: Box<dyn Classifier>,
    preprocessor: Preprocessor,
    labels: ClassLabels,
}

impl Predictor {
    pub fn new(
        classifier: Box<dyn Classifier>,
        preprocessor: Preprocessor,
        labels: ClassLabels,
    ) -> Self {
        Self {
            classifier,
            preprocessor,
            labels,
        }
    }

    /// Loads the configured ONNX model. Returns `None` when it cannot be
    /// loaded so the server can keep running without a model.
    pub fn load(config: &ModelConfig) -> Option<Self> {
        match Self::try_load(config) {
            Ok(predictor) => {
                info!("Model loaded from {}", config.path);
                Some(predictor)
            }
            Err(e) => {
                error!("Error loading model: {}", e);
                None
            }
        }
    }

    fn try_load(config: &ModelConfig) -> Result<Self> {
        let labels = ClassLabels::new(config.class_names.clone())?;
        let preprocessor = Preprocessor::from_config(config);
        let classifier = OnnxClassifier::load(&config.path, preprocessor.input_shape())?;

        Ok(Self::new(Box::new(classifier), preprocessor, labels))
    }

    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    pub fn predict(&self, image_bytes: &[u8]) -> Result<Prediction> {
        let input = self.preprocessor.run(image_bytes)?;
        let scores = self.classifier.classify(input)?;
        Prediction::from_scores(&scores, &self.labels)
    }
}
