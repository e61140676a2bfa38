//! Main gateway configuration

#![allow(missing_docs)]

use super::*;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Dispatcher configuration
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    /// Execution engines per function type
    #[serde(default)]
    pub executors: ExecutorsConfig,
    /// Functions registered at startup
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Build a configuration from `GATEWAY_*` environment variables layered on defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = env::var("GATEWAY_HOST") {
            config.server.host = host;
        }
        if let Some(port) = parse_env::<u16>("GATEWAY_PORT")? {
            config.server.port = port;
        }
        if let Some(workers) = parse_env::<usize>("GATEWAY_WORKERS")? {
            config.server.workers = Some(workers);
        }
        if let Some(enabled) = parse_env::<bool>("GATEWAY_RATE_LIMIT_ENABLED")? {
            config.rate_limit.enabled = enabled;
        }
        if let Some(max_requests) = parse_env::<u64>("GATEWAY_RATE_LIMIT_MAX_REQUESTS")? {
            config.rate_limit.limits.entry("ip".to_string()).or_default().max_requests =
                max_requests;
        }
        if let Some(window_ms) = parse_env::<u64>("GATEWAY_RATE_LIMIT_WINDOW_MS")? {
            config.rate_limit.limits.entry("ip".to_string()).or_default().window_ms = window_ms;
        }
        if let Ok(ips) = env::var("GATEWAY_WHITELIST_IPS") {
            config.rate_limit.whitelist_ips = split_list(&ips);
        }
        if let Ok(paths) = env::var("GATEWAY_BYPASS_PATHS") {
            config.rate_limit.bypass_paths = split_list(&paths);
        }
        if let Some(timeout) = parse_env::<u64>("GATEWAY_DEFAULT_TIMEOUT_MS")? {
            config.dispatcher.default_timeout_ms = timeout;
        }
        if let Ok(endpoint) = env::var("GATEWAY_CODE_EXECUTOR_URL") {
            config
                .executors
                .entry(crate::core::registry::FunctionType::Code)
                .or_default()
                .endpoint = Some(endpoint);
        }
        if let Ok(level) = env::var("GATEWAY_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = parse_env::<bool>("GATEWAY_LOG_JSON")? {
            config.logging.json = json;
        }

        Ok(config)
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.rate_limit = self.rate_limit.merge(other.rate_limit);
        self.dispatcher = self.dispatcher.merge(other.dispatcher);
        self.logging = self.logging.merge(other.logging);

        for (function_type, executor) in other.executors {
            self.executors.insert(function_type, executor);
        }

        // Functions are keyed by id@version; other wins on collisions
        let mut functions: HashMap<(String, String), FunctionEntry> = self
            .functions
            .into_iter()
            .map(|f| ((f.descriptor.id.clone(), f.descriptor.version.clone()), f))
            .collect();
        let mut order: Vec<(String, String)> = functions.keys().cloned().collect();
        order.sort();
        for entry in other.functions {
            let key = (entry.descriptor.id.clone(), entry.descriptor.version.clone());
            if !functions.contains_key(&key) {
                order.push(key.clone());
            }
            functions.insert(key, entry);
        }
        self.functions = order
            .into_iter()
            .filter_map(|key| functions.remove(&key))
            .collect();

        self
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GatewayError::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
