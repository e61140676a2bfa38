//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::dispatcher::Dispatcher;
use crate::core::executors::ExecutorSet;
use crate::core::rate_limiter::RateLimiter;
use crate::core::registry::{FunctionRegistry, InMemoryRegistry};
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// HTTP server state shared across handlers
///
/// Everything here is read-only after startup except the limiter's window
/// store, which synchronizes per key internally.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Admission control
    pub limiter: Arc<RateLimiter>,
    /// Invocation pipeline
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: Config, limiter: RateLimiter, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            limiter: Arc::new(limiter),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Wire the limiter, registry and executors described by the configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let registry = InMemoryRegistry::from_entries(config.functions());
        info!("Registered {} function version(s)", registry.len());
        Self::with_registry(config, Arc::new(registry))
    }

    /// Same as [`AppState::from_config`] but reading functions from an external registry
    pub fn with_registry(config: Config, registry: Arc<dyn FunctionRegistry>) -> Result<Self> {
        let limiter = RateLimiter::new(config.rate_limit())?
            .with_function_prefix(config.dispatcher().function_path_prefix.clone());
        let executors = ExecutorSet::from_config(config.executors())?;
        let dispatcher = Dispatcher::new(registry, executors, config.dispatcher().clone());
        Ok(Self::new(config, limiter, dispatcher))
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
