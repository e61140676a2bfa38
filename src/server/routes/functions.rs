//! Function invocation routes

use crate::server::handlers::invoke_function;
use actix_web::web;

/// Mount `{prefix}/{id}` for every HTTP method
pub fn configure_routes(cfg: &mut web::ServiceConfig, prefix: &str) {
    let prefix = prefix.trim_end_matches('/');
    cfg.service(
        web::scope(prefix)
            .route("/{function_id}", web::route().to(invoke_function))
            .route("/{function_id}/", web::route().to(invoke_function)),
    );
}
