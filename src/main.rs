use anyhow::Result;
use gesture_serve::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await.and_then(config::validate) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    let log_filter = match config::log_filter(&log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .json()
        .init();

    info!("Starting gesture-serve with log level: {}", log_level);
    info!(
        model = %config.model.path,
        input_width = config.model.input_width,
        input_height = config.model.input_height,
        classes = config.model.class_names.len(),
        "Configuration loaded successfully"
    );

    server::run(config).await?;

    Ok(())
}
