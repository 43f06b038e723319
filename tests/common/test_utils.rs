use axum::{Router, body::Body, http::Request, response::Response};
use gesture_serve::{
    config::GESTURE_CLASSES,
    model::{ClassLabels, Classifier, Predictor, Preprocessor},
    server::{
        self,
        handlers::{AppState, StaticSite},
    },
};
use image::{DynamicImage, ImageFormat, Luma, Rgb, Rgba};
use serde_json::Value;
use std::io::Cursor;
use tempfile::TempDir;

pub const BOUNDARY: &str = "gesture-serve-test-boundary";
pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body><h1>Gesture</h1></body></html>";
pub const SCRIPT_JS: &str = "console.log('gesture');";
pub const TEST_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub fn gesture_labels() -> ClassLabels {
    ClassLabels::new(GESTURE_CLASSES.iter().map(|name| name.to_string()).collect()).unwrap()
}

/// Predictor with the default 160x160 preprocessing and the gesture labels.
pub fn create_test_predictor(classifier: impl Classifier + 'static) -> Predictor {
    Predictor::new(
        Box::new(classifier),
        Preprocessor::new(160, 160),
        gesture_labels(),
    )
}

/// Static directory holding `index.html` and `script.js`.
pub fn create_static_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.path().join("script.js"), SCRIPT_JS).unwrap();
    dir
}

pub fn create_test_app(predictor: Option<Predictor>, static_dir: &TempDir) -> Router {
    create_test_app_with_limit(predictor, static_dir, TEST_BODY_LIMIT)
}

pub fn create_test_app_with_limit(
    predictor: Option<Predictor>,
    static_dir: &TempDir,
    max_upload_bytes: usize,
) -> Router {
    let site = StaticSite::new(static_dir.path(), "index.html");
    server::router(AppState::new(predictor, site), max_upload_bytes)
}

pub fn png_bytes(image: DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn solid_rgb_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    png_bytes(DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        Rgb(color),
    )))
}

pub fn solid_rgba_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    png_bytes(DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        width,
        height,
        Rgba(color),
    )))
}

pub fn solid_gray_png(width: u32, height: u32, level: u8) -> Vec<u8> {
    png_bytes(DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
        width,
        height,
        Luma([level]),
    )))
}

/// One part of a `multipart/form-data` body.
pub struct FormPart<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content: &'a [u8],
}

impl<'a> FormPart<'a> {
    pub fn file(name: &'a str, file_name: &'a str, content: &'a [u8]) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            content,
        }
    }

    pub fn text(name: &'a str, content: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            content: content.as_bytes(),
        }
    }
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn predict_request(parts: &[FormPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn read_json(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).unwrap()
}
