//! HTTP middleware implementations
//!
//! - Rate limiting (admission control ahead of every route)
//! - Request ID tracking

mod helpers;
mod rate_limit;
mod request_id;


pub use helpers::{denial_response, rate_limit_request};
pub use rate_limit::{RateLimitMiddleware, RateLimitMiddlewareService};
pub use request_id::{REQUEST_ID_HEADER, RequestIdMiddleware, RequestIdMiddlewareService};
