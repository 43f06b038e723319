use super::types::PreprocessedTensor;
use crate::{
    Result,
    config::{ModelConfig, Normalization, ResizeFilter},
};
use image::imageops;
use tract_onnx::prelude::tract_ndarray::Array4;

/// Turns uploaded image bytes into a `(1, height, width, 3)` tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preprocessor {
    width: u32,
    height: u32,
    normalization: Normalization,
    filter: ResizeFilter,
}

impl Preprocessor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            normalization: Normalization::default(),
            filter: ResizeFilter::default(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.input_width, config.input_height)
            .with_normalization(config.normalization)
            .with_filter(config.resize_filter)
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn input_shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, 3]
    }

    pub fn run(&self, image_bytes: &[u8]) -> Result<PreprocessedTensor> {
        let rgb = image::load_from_memory(image_bytes)?.to_rgb8();
        // Stretches to the target size; aspect ratio is not kept.
        let resized = imageops::resize(&rgb, self.width, self.height, self.filter.into());

        let normalization = self.normalization;
        let [batch, height, width, channels] = self.input_shape();
        let tensor = Array4::from_shape_fn((batch, height, width, channels), |(_, y, x, c)| {
            normalization.apply(resized[(x as u32, y as u32)][c])
        });

        Ok(tensor)
    }
}
