//! Core functionality for the Gateway
//!
//! Admission control, function resolution and invocation dispatch.

pub mod clock;
pub mod dispatcher;
pub mod executors;
pub mod rate_limiter;
pub mod registry;
