//! Helper functions for middleware

use crate::core::rate_limiter::{RateLimitRequest, RateLimitVerdict};
use actix_web::HttpResponse;
use actix_web::http::header::{HeaderMap, RETRY_AFTER};

/// Copy what the limiter needs out of an actix request
pub fn rate_limit_request(method: &str, path: &str, headers: &HeaderMap) -> RateLimitRequest {
    let mut request = RateLimitRequest::new(method, path);
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request.insert_header(name.as_str(), value);
        }
    }
    request
}

/// 429 response for a denied verdict
pub fn denial_response(verdict: &RateLimitVerdict) -> HttpResponse {
    let mut response = HttpResponse::TooManyRequests();
    response.insert_header((RETRY_AFTER, verdict.retry_after_secs.unwrap_or(1).to_string()));
    for (name, value) in &verdict.headers {
        response.insert_header((name.as_str(), value.as_str()));
    }
    response.json(verdict.denial_body())
}
