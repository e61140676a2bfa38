//! Error handling for the Gateway
//!
//! This module defines all error types used throughout the gateway and how they
//! are rendered as HTTP responses.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod response;
mod types;

pub use response::ErrorBody;
pub use types::{GatewayError, Result};
