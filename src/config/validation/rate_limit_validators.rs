//! Rate limit validators

use super::Validate;
use crate::config::models::RateLimitConfig;
use crate::core::rate_limiter::{Dimension, IpWhitelist};

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, rule) in &self.limits {
            Dimension::parse(name)?;
            validate_rule(name, rule.window_ms, rule.max_requests)?;
        }

        for (name, rule) in &self.endpoint_limits {
            match Dimension::parse(name)? {
                Dimension::EndpointPattern { .. } => {}
                _ => {
                    return Err(format!(
                        "Endpoint limit '{}' must be written as 'METHOD /path'",
                        name
                    ));
                }
            }
            validate_rule(name, rule.window_ms, rule.max_requests)?;
        }

        for path in &self.bypass_paths {
            if !path.starts_with('/') {
                return Err(format!("Bypass path '{}' must start with '/'", path));
            }
        }

        IpWhitelist::parse(&self.whitelist_ips)?;

        if self.cleanup_interval_secs == 0 {
            return Err("Rate limit cleanup interval cannot be 0".to_string());
        }

        Ok(())
    }
}

fn validate_rule(name: &str, window_ms: u64, max_requests: u64) -> Result<(), String> {
    if window_ms == 0 {
        return Err(format!("Rate limit '{}' window_ms must be greater than 0", name));
    }
    if max_requests == 0 {
        return Err(format!(
            "Rate limit '{}' max_requests must be greater than 0",
            name
        ));
    }
    Ok(())
}
