//! Utility modules for the gateway
//!
//! - **error**: Error types and their HTTP rendering
//! - **logging**: Tracing subscriber setup

pub mod error;
pub mod logging;
