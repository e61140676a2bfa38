//! Rate limiting configuration

use super::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One quota dimension: at most `max_requests` per fixed window of `window_ms`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitRule {
    /// Window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Requests admitted per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
}

impl RateLimitRule {
    pub fn new(window_ms: u64, max_requests: u64) -> Self {
        Self {
            window_ms,
            max_requests,
        }
    }

    /// Window length rounded up to whole seconds
    pub fn window_secs_ceil(&self) -> u64 {
        self.window_ms.div_ceil(1000)
    }
}

impl Default for RateLimitRule {
    fn default() -> Self {
        Self::new(default_window_ms(), default_max_requests())
    }
}

/// Rate limiting configuration
///
/// `limits` and `endpoint_limits` keep their declaration order; the limiter
/// evaluates dimensions in that order and the first one over quota decides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Rules keyed by dimension: `ip`, `function`, `custom`, `endpoint`,
    /// or an explicit `METHOD /path` endpoint key
    #[serde(default = "default_limits")]
    pub limits: IndexMap<String, RateLimitRule>,
    /// Endpoint-specific rules keyed by `METHOD /path/pattern`
    #[serde(default)]
    pub endpoint_limits: IndexMap<String, RateLimitRule>,
    /// Paths that skip admission control entirely (exact or prefix match)
    #[serde(default = "default_bypass_paths")]
    pub bypass_paths: Vec<String>,
    /// Client addresses that skip admission control (exact IP or CIDR)
    #[serde(default)]
    pub whitelist_ips: Vec<String>,
    /// Interval between sweeps of expired window entries
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_limits() -> IndexMap<String, RateLimitRule> {
    let mut limits = IndexMap::new();
    limits.insert("ip".to_string(), RateLimitRule::default());
    limits
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limits: default_limits(),
            endpoint_limits: IndexMap::new(),
            bypass_paths: default_bypass_paths(),
            whitelist_ips: Vec::new(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl RateLimitConfig {
    /// Merge rate limit configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.enabled {
            self.enabled = false;
        }
        if other.limits != default_limits() {
            self.limits = other.limits;
        }
        for (key, rule) in other.endpoint_limits {
            self.endpoint_limits.insert(key, rule);
        }
        for path in other.bypass_paths {
            if !self.bypass_paths.contains(&path) {
                self.bypass_paths.push(path);
            }
        }
        for ip in other.whitelist_ips {
            if !self.whitelist_ips.contains(&ip) {
                self.whitelist_ips.push(ip);
            }
        }
        if other.cleanup_interval_secs != default_cleanup_interval_secs() {
            self.cleanup_interval_secs = other.cleanup_interval_secs;
        }
        self
    }

    /// Longest configured window, used to age out stale counters
    pub fn max_window_ms(&self) -> u64 {
        self.limits
            .values()
            .chain(self.endpoint_limits.values())
            .map(|rule| rule.window_ms)
            .max()
            .unwrap_or_else(default_window_ms)
    }
}
