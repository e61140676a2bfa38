//! Server response types

use serde::Serialize;
use std::borrow::Cow;

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    /// Whether admission control is active
    pub rate_limiting: bool,
}
