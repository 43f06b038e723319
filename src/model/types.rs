use crate::{Error, Result};
use tract_onnx::prelude::tract_ndarray::Array4;

/// NHWC `f32` batch of one image, as fed to the classifier.
pub type PreprocessedTensor = Array4<f32>;

/// Ordered class names; position `i` names model output `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::config("At least one class name is required"));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.names.iter().any(|name| name == label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub index: usize,
    pub confidence: f32,
}

impl Prediction {
    /// Picks the highest score. The score itself is reported as confidence,
    /// without re-normalization.
    pub fn from_scores(scores: &[f32], labels: &ClassLabels) -> Result<Self> {
        if scores.len() != labels.len() {
            return Err(Error::OutputMismatch {
                expected: labels.len(),
                actual: scores.len(),
            });
        }
        if scores.iter().any(|score| score.is_nan()) {
            return Err(Error::model("Model output contains NaN"));
        }

        let (index, confidence) =
            argmax(scores).ok_or_else(|| Error::model("Model returned no scores"))?;
        let label = labels
            .get(index)
            .ok_or_else(|| Error::internal(format!("No class label at index {}", index)))?;

        Ok(Self {
            label: label.to_string(),
            index,
            confidence,
        })
    }

    pub fn formatted_confidence(&self) -> String {
        format!("{:.4}", self.confidence)
    }
}

/// Index and value of the maximum; the first index wins on ties.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((index, score)),
        })
}
