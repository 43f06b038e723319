use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Directory served at the web root.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Entry page inside `static_dir`, returned for `GET /`.
    #[serde(default = "default_index_file")]
    pub index_file: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default = "default_input_size")]
    pub input_width: u32,
    #[serde(default = "default_input_size")]
    pub input_height: u32,
    #[serde(default)]
    pub normalization: Normalization,
    #[serde(default)]
    pub resize_filter: ResizeFilter,
    /// Ordered labels; index `i` names output score `i`.
    #[serde(default = "default_class_names")]
    pub class_names: Vec<String>,
}

/// Pixel scaling applied after resizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Raw `0.0..=255.0` values.
    #[default]
    None,
    /// `v / 255`, range `[0, 1]`.
    Unit,
    /// `v / 127.5 - 1`, range `[-1, 1]`.
    Symmetric,
}

impl Normalization {
    pub fn apply(self, value: u8) -> f32 {
        let value = f32::from(value);
        match self {
            Self::None => value,
            Self::Unit => value / 255.0,
            Self::Symmetric => value / 127.5 - 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            static_dir: default_static_dir(),
            index_file: default_index_file(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            input_width: default_input_size(),
            input_height: default_input_size(),
            normalization: Normalization::default(),
            resize_filter: ResizeFilter::default(),
            class_names: default_class_names(),
        }
    }
}

pub const GESTURE_CLASSES: [&str; 10] = [
    "c_shape",
    "fist",
    "fist_moved",
    "index_finger",
    "l_shape",
    "ok_sign",
    "palm",
    "palm_moved",
    "thumb_down",
    "thumb_up",
];

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_model_path() -> String {
    "gesture_model.onnx".to_string()
}

fn default_input_size() -> u32 {
    160
}

fn default_class_names() -> Vec<String> {
    GESTURE_CLASSES.iter().map(|name| name.to_string()).collect()
}
