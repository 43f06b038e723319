use super::types::{ApiError, HealthResponse, PredictionResponse};
use crate::{Error, config::ServerConfig, model::Predictor};
use axum::{
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{Html, Json},
};
use std::{path::PathBuf, sync::Arc, time::Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    /// `None` when the model failed to load at startup.
    pub predictor: Option<Arc<Predictor>>,
    pub site: Arc<StaticSite>,
}

impl AppState {
    pub fn new(predictor: Option<Predictor>, site: StaticSite) -> Self {
        Self {
            predictor: predictor.map(Arc::new),
            site: Arc::new(site),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaticSite {
    pub dir: PathBuf,
    pub index_file: String,
}

impl StaticSite {
    pub fn new(dir: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            index_file: index_file.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.static_dir, &config.index_file)
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(&self.index_file)
    }
}

struct UploadedImage {
    file_name: String,
    bytes: Bytes,
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, String)> {
    let path = state.site.index_path();
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Ok(Html(page)),
        Err(e) => {
            warn!("Failed to serve {}: {}", path.display(), e);
            Err((
                StatusCode::NOT_FOUND,
                format!("Could not read {}: {}", path.display(), e),
            ))
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_loaded: state.predictor.is_some(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    let Some(predictor) = state.predictor.clone() else {
        warn!(%request_id, "Prediction requested but no model is loaded");
        return Err(ApiError::ModelNotLoaded);
    };

    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await,
        Err(rejection) => {
            warn!(%request_id, "Request is not a multipart upload: {}", rejection);
            Err(ApiError::NoFilePart)
        }
    }
    .inspect_err(|e| warn!(%request_id, "Rejected upload: {}", e.message()))?;

    info!(
        %request_id,
        file_name = %upload.file_name,
        size = upload.bytes.len(),
        "Received image for prediction"
    );

    let started = Instant::now();
    let prediction = tokio::task::spawn_blocking(move || predictor.predict(&upload.bytes))
        .await
        .map_err(|e| Error::internal(format!("Inference task failed: {}", e)))
        .and_then(|result| result)
        .map_err(|e| {
            error!(%request_id, "Prediction failed: {}", e);
            ApiError::Prediction(e)
        })?;

    info!(
        %request_id,
        label = %prediction.label,
        confidence = prediction.confidence,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Prediction complete"
    );

    Ok(Json(PredictionResponse::from(&prediction)))
}

/// Finds the first `file` field that carries a file name. Fields without a
/// file name are plain form values and are skipped.
async fn read_upload(multipart: &mut Multipart) -> Result<UploadedImage, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(ApiError::NoFilePart),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(ApiError::PayloadTooLarge);
            }
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return Err(ApiError::NoFilePart);
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if file_name.is_empty() {
            return Err(ApiError::NoSelectedFile);
        }

        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge
            } else {
                ApiError::Prediction(Error::from(e))
            }
        })?;
        return Ok(UploadedImage { file_name, bytes });
    }
}
