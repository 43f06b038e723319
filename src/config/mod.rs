mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads configuration from `CONFIG_PATH` (or `config.yaml`) and applies the
/// `PORT` override. A missing default file yields built-in defaults; a missing
/// file named through `CONFIG_PATH` is an error.
pub async fn load() -> Result<Config> {
    let config = match env::var("CONFIG_PATH") {
        Ok(config_path) => load_from(&config_path).await?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_from(DEFAULT_CONFIG_PATH).await?
        }
        Err(_) => {
            debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
            Config::default()
        }
    };

    apply_port_override(config, env::var("PORT").ok())
}

pub async fn load_from(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from: {}", config_path.display());

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    // An empty document deserializes to unit, not to an empty mapping.
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

pub fn apply_port_override(mut config: Config, port: Option<String>) -> Result<Config> {
    if let Some(port) = port {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }
    Ok(config)
}

/// Builds the log filter from a bare level (`debug`) or from `RUST_LOG`-style
/// directives (`gesture_serve=debug,tower_http=info`).
pub fn log_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| {
        Error::config(format!(
            "Invalid log filter '{}': {}. Use a level (error, warn, info, debug, trace) or directives like 'gesture_serve=debug'",
            directives, e
        ))
    })
}

pub fn validate(config: Config) -> Result<Config> {
    if config.model.input_width == 0 || config.model.input_height == 0 {
        return Err(Error::config(format!(
            "Model input size must be non-zero, got {}x{}",
            config.model.input_width, config.model.input_height
        )));
    }
    if config.model.class_names.is_empty() {
        return Err(Error::config("model.class_names must not be empty"));
    }
    if config.server.max_upload_bytes == 0 {
        return Err(Error::config("server.max_upload_bytes must be non-zero"));
    }
    Ok(config)
}
