//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod dispatcher;
pub mod executor;
pub mod function;
pub mod gateway;
pub mod logging;
pub mod rate_limit;
pub mod server;

// Re-export all configuration types
pub use dispatcher::*;
pub use executor::*;
pub use function::*;
pub use gateway::*;
pub use logging::*;
pub use rate_limit::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

pub fn default_true() -> bool {
    true
}

/// Default fixed window for the `ip` dimension
pub fn default_window_ms() -> u64 {
    60_000
}

pub fn default_max_requests() -> u64 {
    100
}

pub fn default_cleanup_interval_secs() -> u64 {
    60
}

pub fn default_bypass_paths() -> Vec<String> {
    vec!["/health".to_string()]
}

/// Default platform execution timeout
pub fn default_execution_timeout_ms() -> u64 {
    30_000
}

/// Upper bound a function descriptor may request
pub fn default_max_execution_timeout_ms() -> u64 {
    300_000
}

pub fn default_function_path_prefix() -> String {
    "/functions".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
