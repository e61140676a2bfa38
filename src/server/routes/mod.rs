//! HTTP route modules

pub mod functions;
