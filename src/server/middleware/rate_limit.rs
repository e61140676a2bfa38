//! Rate limiting middleware

use super::helpers::{denial_response, rate_limit_request};
use crate::server::state::AppState;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::web;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info};

/// Admission control for Actix-web
///
/// Reads the limiter from `web::Data<AppState>`; requests pass through untouched
/// when no state is registered.
pub struct RateLimitMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService { service }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        };

        let request = rate_limit_request(req.method().as_str(), req.path(), req.headers());
        let verdict = state.limiter.evaluate(&request, None);

        if !verdict.allowed {
            info!(
                method = %request.method,
                path = %request.path,
                limit_type = verdict.limit_type.as_deref().unwrap_or("unknown"),
                retry_after = verdict.retry_after_secs.unwrap_or(1),
                "Rate limit exceeded"
            );
            let response = denial_response(&verdict);
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        debug!(method = %request.method, path = %request.path, "Request admitted");
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            for (name, value) in &verdict.headers {
                if let (Ok(name), Ok(value)) = (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    res.headers_mut().insert(name, value);
                }
            }
            Ok(res.map_into_left_body())
        })
    }
}
