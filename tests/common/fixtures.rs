//! Test fixtures
//!
//! `TestGateway` wires the real limiter, registry and dispatcher behind the
//! real actix application. Time only moves when a test advances the clock.

use actix_web::{test, web};
use functions_gateway::config::{Config, RateLimitRule};
use functions_gateway::core::clock::ManualClock;
use functions_gateway::core::dispatcher::Dispatcher;
use functions_gateway::core::executors::{Executor, ExecutorSet};
use functions_gateway::core::rate_limiter::RateLimiter;
use functions_gateway::core::registry::{FunctionDescriptor, FunctionType, InMemoryRegistry};
use functions_gateway::server::AppState;
use std::sync::Arc;

use super::executors::EchoExecutor;

/// Fixed starting instant for the manual clock
pub const START: u64 = 1_700_000_000_000;

/// A fully wired application over a manual clock
pub struct TestGateway {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub registry: Arc<InMemoryRegistry>,
}

impl TestGateway {
    pub fn builder() -> TestGatewayBuilder {
        TestGatewayBuilder::default()
    }

    /// Shared state for `create_app`
    pub fn data(&self) -> web::Data<AppState> {
        web::Data::new(self.state.clone())
    }

    pub fn advance(&self, ms: u64) {
        self.clock.advance(ms);
    }
}

/// Builder for [`TestGateway`]
pub struct TestGatewayBuilder {
    config: Config,
    executors: ExecutorSet,
}

impl Default for TestGatewayBuilder {
    fn default() -> Self {
        let mut config = Config::default();
        config.gateway.rate_limit.limits.clear();
        Self {
            config,
            executors: ExecutorSet::new().with(FunctionType::Code, Arc::new(EchoExecutor), None),
        }
    }
}

impl TestGatewayBuilder {
    /// Add a limits entry; declaration order is evaluation order
    pub fn limit(mut self, dimension: &str, window_ms: u64, max_requests: u64) -> Self {
        self.config
            .gateway
            .rate_limit
            .limits
            .insert(dimension.to_string(), RateLimitRule::new(window_ms, max_requests));
        self
    }

    pub fn ip_limit(self, window_ms: u64, max_requests: u64) -> Self {
        self.limit("ip", window_ms, max_requests)
    }

    pub fn endpoint_limit(mut self, pattern: &str, window_ms: u64, max_requests: u64) -> Self {
        self.config
            .gateway
            .rate_limit
            .endpoint_limits
            .insert(pattern.to_string(), RateLimitRule::new(window_ms, max_requests));
        self
    }

    pub fn whitelist(mut self, entry: &str) -> Self {
        self.config
            .gateway
            .rate_limit
            .whitelist_ips
            .push(entry.to_string());
        self
    }

    pub fn bypass(mut self, path: &str) -> Self {
        self.config
            .gateway
            .rate_limit
            .bypass_paths
            .push(path.to_string());
        self
    }

    pub fn rate_limiting(mut self, enabled: bool) -> Self {
        self.config.gateway.rate_limit.enabled = enabled;
        self
    }

    pub fn default_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.gateway.dispatcher.default_timeout_ms = timeout_ms;
        self
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config.gateway.server.max_body_size = bytes;
        self
    }

    pub fn executor(
        mut self,
        function_type: FunctionType,
        executor: Arc<dyn Executor>,
        max_concurrency: Option<usize>,
    ) -> Self {
        self.executors.insert(function_type, executor, max_concurrency);
        self
    }

    pub fn build(self) -> TestGateway {
        let clock = Arc::new(ManualClock::new(START));
        let registry = Arc::new(seed_registry());

        let limiter = RateLimiter::new(self.config.rate_limit())
            .unwrap()
            .with_function_prefix(self.config.dispatcher().function_path_prefix.clone())
            .with_clock(clock.clone());
        let dispatcher = Dispatcher::new(
            registry.clone(),
            self.executors,
            self.config.dispatcher().clone(),
        );

        TestGateway {
            state: AppState::new(self.config, limiter, dispatcher),
            clock,
            registry,
        }
    }
}

/// Functions every test gateway knows about
fn seed_registry() -> InMemoryRegistry {
    let registry = InMemoryRegistry::new();
    registry.register(
        FunctionDescriptor::new("echo", "1.0.0").with_language("typescript"),
        Some("export default (x) => x".to_string()),
    );
    registry.register(
        FunctionDescriptor::new("echo", "2.0.0").with_language("typescript"),
        Some("export default (x) => ({ ...x })".to_string()),
    );
    registry.register(FunctionDescriptor::new("hello", "1.0.0"), None);
    registry.register(
        FunctionDescriptor::new("writer", "1.0.0").with_type("generative"),
        None,
    );
    registry.register(
        FunctionDescriptor::new("planner", "1.0.0")
            .with_type("agentic")
            .with_timeout_ms(50),
        None,
    );
    registry.register(
        FunctionDescriptor::new("teleport", "0.1.0").with_type("quantum"),
        None,
    );
    registry
}

/// A request from a given client address
pub fn client_request(method: &str, uri: &str, ip: &str) -> test::TestRequest {
    let method = actix_web::http::Method::from_bytes(method.as_bytes()).unwrap();
    test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header(("x-forwarded-for", ip.to_string()))
}
