use super::types::PreprocessedTensor;
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;
use tract_onnx::prelude::*;

/// Scores one preprocessed image against every class.
pub trait Classifier: Send + Sync {
    fn classify(&self, input: PreprocessedTensor) -> Result<Vec<f32>>;
}

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// ONNX model executed with tract. Loaded once; read-only afterwards.
pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    pub fn load(path: impl AsRef<Path>, input_shape: [usize; 4]) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading ONNX model from {} with input {:?}", path.display(), input_shape);

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact(input_shape).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| Error::model(format!("{}: {:#}", path.display(), e)))?;

        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, input: PreprocessedTensor) -> Result<Vec<f32>> {
        let outputs = self
            .plan
            .run(tvec!(input.into_tensor().into()))
            .map_err(|e| Error::model(format!("Inference failed: {:#}", e)))?;

        let scores = outputs
            .first()
            .ok_or_else(|| Error::model("Model produced no outputs"))?
            .to_array_view::<f32>()
            .map_err(|e| Error::model(format!("Unexpected output tensor: {:#}", e)))?
            .iter()
            .copied()
            .collect();

        Ok(scores)
    }
}
