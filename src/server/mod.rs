pub mod handlers;
pub mod types;

use crate::{Result, config::Config, model::Predictor};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::{AppState, StaticSite};
use std::net::SocketAddr;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

/// Routes: the entry page at `/`, `/health`, `/predict`, and every other
/// file under the static directory.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let assets = ServeDir::new(&state.site.dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Startup continues without a model; /predict then reports it as unavailable.
    let predictor = Predictor::load(&config.model);
    if predictor.is_none() {
        warn!("Serving without a model; predictions will fail until restart");
    }

    let app_state = AppState::new(predictor, StaticSite::from_config(&config.server));
    let app = router(app_state, config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
