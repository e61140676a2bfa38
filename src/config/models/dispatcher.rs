//! Invocation dispatcher configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Invocation dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Execution budget for functions that do not declare `timeout_ms`
    #[serde(default = "default_execution_timeout_ms")]
    pub default_timeout_ms: u64,
    /// Ceiling applied to a descriptor's own `timeout_ms`
    #[serde(default = "default_max_execution_timeout_ms")]
    pub max_timeout_ms: u64,
    /// Route prefix under which `/{id}` invocations are served
    #[serde(default = "default_function_path_prefix")]
    pub function_path_prefix: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_execution_timeout_ms(),
            max_timeout_ms: default_max_execution_timeout_ms(),
            function_path_prefix: default_function_path_prefix(),
        }
    }
}

impl DispatcherConfig {
    /// Merge dispatcher configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.default_timeout_ms != default_execution_timeout_ms() {
            self.default_timeout_ms = other.default_timeout_ms;
        }
        if other.max_timeout_ms != default_max_execution_timeout_ms() {
            self.max_timeout_ms = other.max_timeout_ms;
        }
        if other.function_path_prefix != default_function_path_prefix() {
            self.function_path_prefix = other.function_path_prefix;
        }
        self
    }

    /// Budget for one execution given the descriptor's requested timeout
    pub fn execution_budget(&self, requested_ms: Option<u64>) -> Duration {
        let ms = requested_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(self.default_timeout_ms)
            .min(self.max_timeout_ms);
        Duration::from_millis(ms)
    }
}
