//! HTTP response handling for errors

use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl GatewayError {
    /// HTTP status used when this error reaches a client
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            GatewayError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            GatewayError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Executor(_)
            | GatewayError::Config(_)
            | GatewayError::Serialization(_)
            | GatewayError::Yaml(_)
            | GatewayError::Io(_)
            | GatewayError::HttpClient(_)
            | GatewayError::Store(_)
            | GatewayError::Server(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client
    ///
    /// Infrastructure failures are collapsed into a generic message; executor
    /// failures keep their text since it describes the user's own function.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Config(_)
            | GatewayError::Serialization(_)
            | GatewayError::Yaml(_)
            | GatewayError::Io(_)
            | GatewayError::HttpClient(_)
            | GatewayError::Store(_)
            | GatewayError::Server(_)
            | GatewayError::Internal(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }

    /// JSON body `{ "error": ... }` for this error
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(self.to_body())
    }
}

/// Standard error response format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
