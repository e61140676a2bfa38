//! Utility functions for rate limiter

use super::limiter::RateLimiter;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

impl RateLimiter {
    /// Remove windows that have ended for every configured rule
    pub fn cleanup(&self) -> Result<usize> {
        let removed = self
            .store
            .sweep(self.clock.now_ms(), self.max_window_ms)?;
        if removed > 0 {
            debug!(removed, remaining = self.store.len(), "Swept stale rate limit windows");
        }
        Ok(removed)
    }

    /// Start background cleanup task
    pub fn start_cleanup_task(self: Arc<Self>) -> JoinHandle<()> {
        let period = Duration::from_secs(self.cleanup_interval_secs.max(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(e) = self.cleanup() {
                    warn!("Rate limit cleanup failed: {}", e);
                }
            }
        })
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Names of the configured rules in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name.as_str()).collect()
    }

    /// Number of live (dimension, key) windows
    pub fn tracked_keys(&self) -> usize {
        self.store.len()
    }
}
