//! Executor input and output types

use crate::core::dispatcher::RawRequest;
use crate::core::registry::FunctionDescriptor;
use bytes::Bytes;
use serde_json::{Map, Value};
use thiserror::Error;

/// Everything an executor gets for one call
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub descriptor: &'a FunctionDescriptor,
    /// Parsed request body
    pub input: &'a Value,
    pub request: &'a RawRequest,
    /// Source text, fetched for code functions only
    pub source: Option<&'a str>,
}

/// What an executor produced
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutorOutput {
    /// A JSON result plus optional metadata
    Value {
        result: Value,
        executed_with: Option<String>,
        meta: Map<String, Value>,
    },
    /// A raw HTTP-shaped response
    Http {
        status: u16,
        content_type: Option<String>,
        body: Bytes,
    },
    /// Accepted for asynchronous completion
    Deferred { task_id: String },
}

impl ExecutorOutput {
    pub fn value(result: Value) -> Self {
        Self::Value {
            result,
            executed_with: None,
            meta: Map::new(),
        }
    }

    pub fn with_executed_with(self, runtime: impl Into<String>) -> Self {
        match self {
            Self::Value { result, meta, .. } => Self::Value {
                result,
                executed_with: Some(runtime.into()),
                meta,
            },
            other => other,
        }
    }

    pub fn http(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self::Http {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn deferred(task_id: impl Into<String>) -> Self {
        Self::Deferred {
            task_id: task_id.into(),
        }
    }
}

/// Executor failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("{0}")]
    Failed(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Timeout(String),
}
