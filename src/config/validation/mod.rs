//! Configuration validation
//!
//! - `config_validators`: gateway, server and dispatcher settings
//! - `rate_limit_validators`: dimension names, rules, whitelist entries
//! - `executor_validators`: engine endpoints and concurrency caps

mod config_validators;
mod executor_validators;
mod rate_limit_validators;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
