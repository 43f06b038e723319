use gesture_serve::{
    Error, Result,
    model::{Classifier, PreprocessedTensor},
};
use mockall::mock;

mock! {
    pub Model {}

    impl Classifier for Model {
        fn classify(&self, input: PreprocessedTensor) -> Result<Vec<f32>>;
    }
}

/// Mock that always returns the same scores.
pub fn fixed_scores(scores: Vec<f32>) -> MockModel {
    let mut model = MockModel::new();
    model
        .expect_classify()
        .returning(move |_| Ok(scores.clone()));
    model
}

/// Mock that fails every inference call.
pub fn failing_model(message: &'static str) -> MockModel {
    let mut model = MockModel::new();
    model
        .expect_classify()
        .returning(move |_| Err(Error::model(message)));
    model
}

/// Mock whose softmax scores depend on the mean brightness of each channel,
/// so different images land on different classes and equal images on equal
/// scores.
pub fn brightness_model(classes: usize) -> MockModel {
    let mut model = MockModel::new();
    model
        .expect_classify()
        .returning(move |input| Ok(brightness_scores(&input, classes)));
    model
}

pub fn brightness_scores(input: &PreprocessedTensor, classes: usize) -> Vec<f32> {
    let pixels = (input.len() / 3).max(1) as f32;
    let mut channel_sums = [0.0f32; 3];
    for ((_, _, _, c), value) in input.indexed_iter() {
        channel_sums[c] += *value;
    }

    let logits: Vec<f32> = (0..classes)
        .map(|class| channel_sums[class % 3] / pixels / 255.0 * (class as f32 + 1.0))
        .collect();
    softmax(&logits)
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|logit| (logit - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|value| value / total).collect()
}
