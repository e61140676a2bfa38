//! HTTP route handlers

use crate::core::dispatcher::{EXECUTION_TIME_HEADER, InvocationResult, RawRequest};
use crate::server::state::AppState;
use crate::server::types::HealthStatus;
use crate::utils::error::ErrorBody;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// Health check endpoint handler
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        rate_limiting: state.limiter.is_enabled(),
    })
}

/// `{prefix}/{id}` for any method; `?version=` pins a version
pub async fn invoke_function(
    state: web::Data<AppState>,
    req: HttpRequest,
    function_id: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    body: Result<web::Bytes, actix_web::Error>,
) -> HttpResponse {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            debug!("Rejected request body: {}", e);
            return rejected_request(&e);
        }
    };
    let function_id = function_id.into_inner();
    let query = query.into_inner();
    let version = query.get("version").cloned();

    let mut raw = RawRequest::new(req.method().as_str(), req.path()).with_body(body);
    raw.query = query;
    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            raw.headers.insert(name.as_str().to_string(), value.to_string());
        }
    }

    debug!(
        function = %function_id,
        version = version.as_deref().unwrap_or("latest"),
        "Dispatching invocation"
    );

    let result = state
        .dispatcher
        .dispatch(&function_id, version.as_deref(), &raw)
        .await;
    invocation_response(&result)
}

/// Render a pipeline result; always `application/json`
pub fn invocation_response(result: &InvocationResult) -> HttpResponse {
    let status =
        StatusCode::from_u16(result.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status)
        .insert_header((
            EXECUTION_TIME_HEADER,
            result.execution_time().unwrap_or(0).to_string(),
        ))
        .json(&result.body)
}

/// `{ error }` for a request the extractors refused; nothing was executed
pub fn rejected_request(err: &actix_web::Error) -> HttpResponse {
    HttpResponse::build(err.as_response_error().status_code())
        .insert_header((EXECUTION_TIME_HEADER, "0"))
        .json(ErrorBody {
            error: err.to_string(),
        })
}

/// Error handler for `QueryConfig` and `PathConfig`
pub fn json_extract_error<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: ResponseError + 'static,
{
    let err = actix_web::Error::from(err);
    let response = rejected_request(&err);
    InternalError::from_response(err, response).into()
}
