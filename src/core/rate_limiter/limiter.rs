//! Core rate limiter implementation

use super::dimension::Dimension;
use super::keys::{IpWhitelist, extract_ip, function_id_from_path, path_matches};
use super::store::{InMemoryWindowStore, WindowStore};
use super::types::{
    HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET, RateLimitContext, RateLimitRequest,
    RateLimitVerdict, WindowKey, WindowState,
};
use crate::config::models::{RateLimitConfig, RateLimitRule, default_function_path_prefix};
use crate::core::clock::{Clock, SystemClock};
use crate::utils::error::{GatewayError, Result};
use indexmap::IndexMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, warn};

/// User-supplied key for the `custom` dimension; `Ok(None)` skips the dimension
pub type KeyExtractor = Arc<dyn Fn(&RateLimitRequest) -> Result<Option<String>> + Send + Sync>;

/// Give up on a key after this many lost compare-and-swap races
const MAX_CAS_ATTEMPTS: usize = 1024;

/// A configured rule with its parsed dimension
#[derive(Debug, Clone)]
pub(super) struct LimitRule {
    pub(super) name: String,
    pub(super) dimension: Dimension,
    pub(super) rule: RateLimitRule,
}

/// Counter state after recording one request against a rule
#[derive(Debug, Clone, Copy)]
struct DimensionHit<'a> {
    rule: &'a LimitRule,
    state: WindowState,
}

impl DimensionHit<'_> {
    fn denied(&self) -> bool {
        self.state.count > self.rule.rule.max_requests
    }

    fn reset_at(&self) -> u64 {
        self.state.window_start.saturating_add(self.rule.rule.window_ms)
    }

    fn retry_after_secs(&self, now_ms: u64) -> u64 {
        let remaining_ms = self.reset_at().saturating_sub(now_ms);
        remaining_ms
            .div_ceil(1000)
            .clamp(1, self.rule.rule.window_secs_ceil().max(1))
    }
}

/// Multi-dimension fixed-window limiter
pub struct RateLimiter {
    pub(super) enabled: bool,
    pub(super) rules: Vec<LimitRule>,
    bypass_paths: Vec<String>,
    whitelist: IpWhitelist,
    function_prefix: String,
    pub(super) cleanup_interval_secs: u64,
    pub(super) max_window_ms: u64,
    pub(super) store: Arc<dyn WindowStore>,
    pub(super) clock: Arc<dyn Clock>,
    key_extractor: Option<KeyExtractor>,
}

impl RateLimiter {
    /// Resolve a configuration into a limiter with an in-memory store and the system clock
    pub fn new(config: &RateLimitConfig) -> Result<Self> {
        let mut rules = Vec::with_capacity(config.limits.len() + config.endpoint_limits.len());
        for (name, rule) in config.limits.iter().chain(config.endpoint_limits.iter()) {
            let dimension = Dimension::parse(name).map_err(GatewayError::Config)?;
            rules.push(LimitRule {
                name: name.trim().to_string(),
                dimension,
                rule: *rule,
            });
        }

        let whitelist = IpWhitelist::parse(&config.whitelist_ips).map_err(GatewayError::Config)?;

        Ok(Self {
            enabled: config.enabled,
            rules,
            bypass_paths: config.bypass_paths.clone(),
            whitelist,
            function_prefix: default_function_path_prefix(),
            cleanup_interval_secs: config.cleanup_interval_secs,
            max_window_ms: config.max_window_ms(),
            store: Arc::new(InMemoryWindowStore::new()),
            clock: Arc::new(SystemClock),
            key_extractor: None,
        })
    }

    pub fn with_store(mut self, store: Arc<dyn WindowStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_key_extractor(mut self, extractor: KeyExtractor) -> Self {
        self.key_extractor = Some(extractor);
        self
    }

    /// Path prefix under which the last segment names a function
    pub fn with_function_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.function_prefix = prefix.into();
        self
    }

    /// Evaluate a request at the current clock time
    pub fn evaluate(
        &self,
        request: &RateLimitRequest,
        context: Option<&RateLimitContext>,
    ) -> RateLimitVerdict {
        self.evaluate_at(request, context, self.clock.now_ms())
    }

    /// Evaluate a request at an explicit time. Never fails: internal errors admit.
    pub fn evaluate_at(
        &self,
        request: &RateLimitRequest,
        context: Option<&RateLimitContext>,
        now_ms: u64,
    ) -> RateLimitVerdict {
        if !self.enabled {
            return RateLimitVerdict::allow();
        }

        match self.try_evaluate(request, context, now_ms) {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    "Rate limiter failed, admitting request"
                );
                RateLimitVerdict::allow()
            }
        }
    }

    fn try_evaluate(
        &self,
        request: &RateLimitRequest,
        context: Option<&RateLimitContext>,
        now_ms: u64,
    ) -> Result<RateLimitVerdict> {
        let method = context
            .and_then(|ctx| ctx.method.as_deref())
            .unwrap_or(&request.method)
            .to_ascii_uppercase();
        let path = context
            .and_then(|ctx| ctx.path.as_deref())
            .unwrap_or(&request.path);

        if self.is_bypassed(path) {
            debug!(path = %path, "Rate limit bypassed for path");
            return Ok(RateLimitVerdict::allow());
        }

        let ip = extract_ip(request);
        if self.whitelist.contains(&ip) {
            debug!(ip = %ip, "Rate limit bypassed for whitelisted address");
            return Ok(RateLimitVerdict::allow());
        }

        let matched_endpoint = self.rules.iter().position(|limit| match &limit.dimension {
            Dimension::EndpointPattern {
                method: rule_method,
                pattern,
            } => *rule_method == method && path_matches(pattern, path),
            _ => false,
        });

        let mut custom_key: Option<Option<String>> = None;
        let mut headers = IndexMap::new();

        for (index, limit) in self.rules.iter().enumerate() {
            let key = match &limit.dimension {
                Dimension::Ip => Some(ip.clone()),
                Dimension::Function => context
                    .and_then(|ctx| ctx.function_id.clone())
                    .filter(|id| !id.is_empty())
                    .or_else(|| function_id_from_path(path, &self.function_prefix)),
                Dimension::Custom => {
                    if custom_key.is_none() {
                        custom_key = Some(self.custom_key(request)?);
                    }
                    custom_key.clone().flatten()
                }
                Dimension::Endpoint if matched_endpoint.is_some() => None,
                Dimension::Endpoint => Some(format!("{} {}", method, path)),
                Dimension::EndpointPattern { pattern, .. } => {
                    (matched_endpoint == Some(index)).then(|| format!("{} {}", method, pattern))
                }
            };

            let Some(key) = key.filter(|k| !k.is_empty()) else {
                continue;
            };

            let state = self.record(&WindowKey::new(limit.name.as_str(), key), &limit.rule, now_ms)?;
            let hit = DimensionHit { rule: limit, state };

            if headers.is_empty() {
                headers = Self::headers_for(&hit);
            }

            if hit.denied() {
                let retry_after = hit.retry_after_secs(now_ms);
                debug!(
                    limit_type = limit.dimension.limit_type(),
                    rule = %limit.name,
                    count = hit.state.count,
                    max_requests = limit.rule.max_requests,
                    "Request denied by rate limit"
                );
                return Ok(RateLimitVerdict {
                    allowed: false,
                    limit_type: Some(limit.dimension.limit_type().to_string()),
                    headers,
                    retry_after_secs: Some(retry_after),
                    reset_at: Some(hit.reset_at()),
                });
            }
        }

        Ok(RateLimitVerdict {
            allowed: true,
            limit_type: None,
            headers,
            retry_after_secs: None,
            reset_at: None,
        })
    }

    /// Record one request against a fixed window and return the new state
    fn record(&self, key: &WindowKey, rule: &RateLimitRule, now_ms: u64) -> Result<WindowState> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let current = self.store.get(key)?;
            let next = match current {
                Some(state) if now_ms.saturating_sub(state.window_start) < rule.window_ms => {
                    WindowState::new(state.count.saturating_add(1), state.window_start)
                }
                _ => WindowState::new(1, now_ms),
            };

            if self.store.compare_and_swap(key, current, next)? {
                return Ok(next);
            }
        }

        Err(GatewayError::store(format!(
            "contention on {}:{} exceeded {} attempts",
            key.dimension, key.key, MAX_CAS_ATTEMPTS
        )))
    }

    fn custom_key(&self, request: &RateLimitRequest) -> Result<Option<String>> {
        let Some(extractor) = &self.key_extractor else {
            return Ok(None);
        };

        catch_unwind(AssertUnwindSafe(|| extractor(request)))
            .map_err(|_| GatewayError::internal("custom key extractor panicked"))?
    }

    fn headers_for(hit: &DimensionHit<'_>) -> IndexMap<String, String> {
        let mut headers = IndexMap::new();
        headers.insert(
            HEADER_LIMIT.to_string(),
            hit.rule.rule.max_requests.to_string(),
        );
        headers.insert(
            HEADER_REMAINING.to_string(),
            hit.rule
                .rule
                .max_requests
                .saturating_sub(hit.state.count)
                .to_string(),
        );
        headers.insert(
            HEADER_RESET.to_string(),
            hit.reset_at().div_ceil(1000).to_string(),
        );
        headers
    }

    fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_paths
            .iter()
            .any(|pattern| path_matches(pattern, path))
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("enabled", &self.enabled)
            .field("rules", &self.rules)
            .field("bypass_paths", &self.bypass_paths)
            .field("whitelist", &self.whitelist)
            .field("function_prefix", &self.function_prefix)
            .field("store", &self.store)
            .field("clock", &self.clock)
            .field("key_extractor", &self.key_extractor.is_some())
            .finish()
    }
}
