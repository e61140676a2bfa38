//! Integration tests for functions-gateway
//!
//! These tests drive requests through the real actix application, limiter
//! and dispatcher. Only executors are stubbed.

pub mod admission_tests;
pub mod config_tests;
pub mod invocation_tests;
