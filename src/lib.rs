//! # functions-gateway
//!
//! An admission-controlled function invocation gateway.
//!
//! Every request passes a multi-dimension fixed-window rate limiter before it
//! reaches the dispatcher, which resolves the function from a registry, picks
//! the executor for its type, runs it under a per-function time budget and
//! wraps the result in a uniform JSON envelope.
//!
//! ## Features
//!
//! - **Rate limiting**: independent quotas per client IP, function, endpoint
//!   pattern or caller-defined key, with whitelist and bypass paths
//! - **Typed executors**: `code`, `generative`, `agentic`, `human` and `cascade` functions
//!   routed to their own execution engines with optional concurrency caps
//! - **Time budgets**: 408 when no execution slot frees up in time, 504 when
//!   the executor itself overruns
//! - **Uniform results**: `_meta` envelope and `X-Execution-Time` header
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use functions_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config)?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Embedding the limiter
//!
//! ```rust
//! use functions_gateway::config::RateLimitConfig;
//! use functions_gateway::core::rate_limiter::{RateLimitRequest, RateLimiter};
//!
//! let limiter = RateLimiter::new(&RateLimitConfig::default()).unwrap();
//! let request = RateLimitRequest::new("GET", "/functions/hello")
//!     .with_header("x-forwarded-for", "203.0.113.7");
//! let verdict = limiter.evaluate(&request, None);
//! assert!(verdict.allowed);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::dispatcher::{Dispatcher, InvocationResult, RawRequest};
pub use core::executors::{Executor, ExecutorError, ExecutorOutput, ExecutorSet};
pub use core::rate_limiter::{RateLimitContext, RateLimitRequest, RateLimitVerdict, RateLimiter};
pub use core::registry::{FunctionDescriptor, FunctionRegistry, FunctionType, InMemoryRegistry};
pub use utils::error::{GatewayError, Result};

use tracing::{debug, info};

/// The gateway: configuration plus a bound-on-run HTTP server
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::HttpServer::new(&config)?;

        Ok(Self { config, server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        let build = build_info();
        info!(
            version = build.version,
            git_hash = build.git_hash,
            "Starting functions gateway"
        );
        debug!("Configuration: {:#?}", self.config);

        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Seconds since the epoch when the crate was built
    pub build_time: &'static str,
    /// Git commit hash, `unknown` outside a checkout
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
