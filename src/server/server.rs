//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::server::handlers::{health_check, json_extract_error};
use crate::server::middleware::{RateLimitMiddleware, RequestIdMiddleware};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

/// Build the Actix-web application around shared state
///
/// Middleware runs outermost first: request id, access log, admission control.
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let prefix = state.config.dispatcher().function_path_prefix.clone();
    let max_body_size = state.config.server().max_body_size;

    App::new()
        .app_data(state)
        .app_data(web::PayloadConfig::new(max_body_size))
        .app_data(web::QueryConfig::default().error_handler(json_extract_error))
        .app_data(web::PathConfig::default().error_handler(json_extract_error))
        .wrap(RateLimitMiddleware)
        .wrap(Logger::default())
        .wrap(RequestIdMiddleware)
        .wrap(DefaultHeaders::new().add(("Server", "functions-gateway")))
        .route("/health", web::get().to(health_check))
        .configure(|cfg| routes::functions::configure_routes(cfg, &prefix))
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        let state = AppState::from_config(config.clone())?;

        Ok(Self {
            config: config.gateway.server.clone(),
            state,
        })
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;

        if self.state.limiter.is_enabled() {
            Arc::clone(&self.state.limiter).start_cleanup_task();
        }

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || create_app(state.clone()))
            .workers(self.config.worker_count())
            .client_request_timeout(Duration::from_secs(self.config.timeout))
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::server(e.to_string()))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
