use crate::{Error, model::Prediction};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_gesture: String,
    pub confidence: String,
}

impl From<&Prediction> for PredictionResponse {
    fn from(prediction: &Prediction) -> Self {
        Self {
            predicted_gesture: prediction.label.clone(),
            confidence: prediction.formatted_confidence(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failures of `POST /predict`, each with a fixed status code.
#[derive(Debug)]
pub enum ApiError {
    ModelNotLoaded,
    NoFilePart,
    NoSelectedFile,
    PayloadTooLarge,
    Prediction(Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFilePart | Self::NoSelectedFile => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ModelNotLoaded | Self::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::ModelNotLoaded => "Model is not loaded".to_string(),
            Self::NoFilePart => "No file part".to_string(),
            Self::NoSelectedFile => "No selected file".to_string(),
            Self::PayloadTooLarge => "File too large".to_string(),
            Self::Prediction(e) => format!("Prediction error: {}", e),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Prediction(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
