//! Admission control
//!
//! Fixed-window rate limiting over several independent dimensions (`ip`,
//! `function`, `custom`, `endpoint`). Counters live in a pluggable
//! [`WindowStore`]; time comes from an injected [`Clock`](crate::core::clock::Clock).

mod dimension;
mod keys;
mod limiter;
mod store;
mod types;
mod utils;


pub use dimension::Dimension;
pub use keys::{IpWhitelist, UNKNOWN_IP, extract_ip, path_matches};
pub use limiter::{KeyExtractor, RateLimiter};
pub use store::{InMemoryWindowStore, WindowStore};
pub use types::{
    HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET, RateLimitContext, RateLimitRequest,
    RateLimitVerdict, WindowKey, WindowState,
};
