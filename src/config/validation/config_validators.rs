//! Core configuration validators

use super::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        self.server.validate()?;
        self.rate_limit.validate()?;
        self.dispatcher.validate()?;
        self.executors.validate()?;

        let mut seen = HashSet::new();
        for entry in &self.functions {
            let descriptor = &entry.descriptor;
            if descriptor.id.trim().is_empty() {
                return Err("Function id cannot be empty".to_string());
            }
            if descriptor.id.contains('/') {
                return Err(format!("Function id '{}' cannot contain '/'", descriptor.id));
            }
            if !seen.insert((descriptor.id.as_str(), descriptor.version.as_str())) {
                return Err(format!(
                    "Duplicate function registration: {}@{}",
                    descriptor.id, descriptor.version
                ));
            }
        }

        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }
        if self.timeout == 0 {
            return Err("Timeout cannot be 0".to_string());
        }
        if self.max_body_size == 0 {
            return Err("Max body size cannot be 0".to_string());
        }
        if self.workers == Some(0) {
            return Err("Worker count cannot be 0".to_string());
        }
        Ok(())
    }
}

impl Validate for DispatcherConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_timeout_ms == 0 {
            return Err("Default execution timeout cannot be 0".to_string());
        }
        if self.default_timeout_ms > self.max_timeout_ms {
            return Err(format!(
                "Default execution timeout ({}ms) exceeds the maximum ({}ms)",
                self.default_timeout_ms, self.max_timeout_ms
            ));
        }
        if !self.function_path_prefix.starts_with('/') {
            return Err("Function path prefix must start with '/'".to_string());
        }
        Ok(())
    }
}
