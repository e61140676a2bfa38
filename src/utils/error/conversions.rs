//! Type conversions for GatewayError

use super::types::GatewayError;
use crate::core::executors::ExecutorError;

impl From<ExecutorError> for GatewayError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Failed(message) => GatewayError::Executor(message),
            ExecutorError::NotImplemented(message) => GatewayError::NotImplemented(message),
            ExecutorError::Unavailable(message) => GatewayError::Unavailable(message),
            ExecutorError::Timeout(message) => GatewayError::GatewayTimeout(message),
        }
    }
}

impl From<tokio::sync::AcquireError> for GatewayError {
    fn from(_: tokio::sync::AcquireError) -> Self {
        GatewayError::Unavailable("Executor is shutting down".to_string())
    }
}
