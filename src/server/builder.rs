//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{info, warn};

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config)
    }
}

/// Load configuration from `config_path` (environment when the file is absent)
/// and run the server until shutdown
pub async fn run_server(config_path: &Path) -> Result<()> {
    let config = load_config(config_path).await?;

    let server = HttpServer::new(&config)?;
    info!(
        "Server starting at: http://{}:{}",
        config.server().host,
        config.server().port
    );
    info!("   GET  /health");
    info!(
        "   ANY  {}/{{id}}[?version=]",
        config.dispatcher().function_path_prefix
    );

    server.start().await
}

/// File configuration layered over environment configuration
pub async fn load_config(config_path: &Path) -> Result<Config> {
    let env_config = Config::from_env()?;

    if !config_path.exists() {
        warn!(
            "Configuration file {:?} not found, using environment configuration",
            config_path
        );
        return Ok(env_config);
    }

    let file_config = Config::from_file(config_path).await?;
    let config = env_config.merge(file_config);
    config.validate()?;
    Ok(config)
}
