//! HTTP server implementation
//!
//! This module provides the HTTP server, routing and middleware.

pub mod middleware;
pub mod routes;

pub mod builder;
mod handlers;
pub mod server;
pub mod state;
pub mod types;
mod utils;


pub use builder::{ServerBuilder, run_server};
pub use handlers::invocation_response;
pub use server::{HttpServer, create_app};
pub use state::AppState;
