mod classifier;
mod predictor;
mod preprocess;
pub mod types;

pub use classifier::{Classifier, OnnxClassifier};
pub use predictor::Predictor;
pub use preprocess::Preprocessor;
pub use types::{ClassLabels, PreprocessedTensor, Prediction};
