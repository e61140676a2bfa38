//! Types for admission control

use indexmap::IndexMap;
use serde_json::{Value, json};
use std::collections::HashMap;

pub const HEADER_LIMIT: &str = "X-RateLimit-Limit";
pub const HEADER_REMAINING: &str = "X-RateLimit-Remaining";
pub const HEADER_RESET: &str = "X-RateLimit-Reset";

/// Counter state for one (dimension, key) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Requests seen in the current window, including denied ones
    pub count: u64,
    /// Window start in epoch milliseconds
    pub window_start: u64,
}

impl WindowState {
    pub fn new(count: u64, window_start: u64) -> Self {
        Self {
            count,
            window_start,
        }
    }
}

/// Store key: the rule name plus the key extracted for it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowKey {
    pub dimension: String,
    pub key: String,
}

impl WindowKey {
    pub fn new(dimension: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            key: key.into(),
        }
    }
}

/// The parts of an inbound request the limiter looks at
#[derive(Debug, Clone, Default)]
pub struct RateLimitRequest {
    pub method: String,
    pub path: String,
    /// Header names are stored lowercased
    headers: HashMap<String, String>,
}

impl RateLimitRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            path: path.into(),
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Caller-supplied hints that the raw request may not carry
#[derive(Debug, Clone, Default)]
pub struct RateLimitContext {
    /// Explicit function id; wins over the one parsed from the path
    pub function_id: Option<String>,
    /// Method used for endpoint rules
    pub method: Option<String>,
    /// Path used for endpoint rules
    pub path: Option<String>,
}

impl RateLimitContext {
    pub fn for_function(function_id: impl Into<String>) -> Self {
        Self {
            function_id: Some(function_id.into()),
            ..Self::default()
        }
    }
}

/// Admission decision for one request
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitVerdict {
    pub allowed: bool,
    /// Dimension that denied the request; always set when `allowed` is false
    pub limit_type: Option<String>,
    /// `X-RateLimit-*` headers for the response
    pub headers: IndexMap<String, String>,
    pub retry_after_secs: Option<u64>,
    /// End of the denying window in epoch milliseconds
    pub reset_at: Option<u64>,
}

impl RateLimitVerdict {
    /// Admit without touching counters or emitting headers
    pub fn allow() -> Self {
        Self {
            allowed: true,
            limit_type: None,
            headers: IndexMap::new(),
            retry_after_secs: None,
            reset_at: None,
        }
    }

    /// 429 payload: `{ error, message, retryAfter, resetAt }`
    pub fn denial_body(&self) -> Value {
        let limit_type = self.limit_type.as_deref().unwrap_or("request");
        let retry_after = self.retry_after_secs.unwrap_or(1);
        json!({
            "error": "Too Many Requests",
            "message": format!(
                "Rate limit exceeded for {}. Try again in {} seconds.",
                limit_type, retry_after
            ),
            "retryAfter": retry_after,
            "resetAt": self.reset_at,
        })
    }
}
