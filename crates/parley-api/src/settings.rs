//! Configuration loading: TOML file plus environment overrides.
//!
//! The file is optional; defaults apply when it is absent. Environment
//! variables override deploy-sensitive values so containers can be
//! configured without editing the file:
//!
//! - `PARLEY_HTTP_ADDR`          host:port to bind
//! - `PARLEY_DB_PATH`            SQLite database path
//! - `PARLEY_INFERENCE_URL`      inference backend base URL
//! - `PARLEY_INFERENCE_API_KEY`  inference backend bearer key

use std::path::Path;

use anyhow::Context;
use secrecy::SecretString;

use parley_types::config::ServiceConfig;

/// Load configuration from `path`, then apply environment overrides.
pub fn load(path: &Path) -> anyhow::Result<ServiceConfig> {
    let mut config = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?
    } else {
        ServiceConfig::default()
    };

    if let Ok(addr) = std::env::var("PARLEY_HTTP_ADDR") {
        let (host, port) = addr
            .rsplit_once(':')
            .context("PARLEY_HTTP_ADDR must be host:port")?;
        config.server.host = host.to_string();
        config.server.port = port.parse().context("parsing PARLEY_HTTP_ADDR port")?;
    }
    if let Ok(db_path) = std::env::var("PARLEY_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(url) = std::env::var("PARLEY_INFERENCE_URL") {
        config.inference.base_url = url;
    }
    if let Ok(key) = std::env::var("PARLEY_INFERENCE_API_KEY") {
        config.inference.api_key = Some(SecretString::from(key));
    }

    Ok(config)
}
