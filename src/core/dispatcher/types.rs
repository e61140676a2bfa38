//! Dispatcher request and result types

use crate::utils::error::GatewayError;
use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

pub const EXECUTION_TIME_HEADER: &str = "X-Execution-Time";

/// Inbound HTTP request as the dispatcher and executors see it
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    /// Header names are stored lowercased
    pub headers: IndexMap<String, String>,
    #[serde(skip)]
    pub body: Bytes,
}

impl RawRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Lowercased media type without parameters
    pub fn media_type(&self) -> Option<String> {
        self.header("content-type").map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// How the request body was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Json,
    Form,
    Text,
    Empty,
}

/// Normalized invocation input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationRequest {
    pub function_id: String,
    pub version: Option<String>,
    pub params: HashMap<String, String>,
    pub body: Value,
    pub content_kind: ContentKind,
}

/// `_meta` block of every envelope produced after executor selection
///
/// `executorType`, `duration` and `executedWith` always come from the
/// dispatcher; executor metadata with the same names is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMeta {
    pub executor_type: String,
    /// Wall-clock milliseconds spent executing
    pub duration: Option<u64>,
    pub executed_with: Option<String>,
    /// Extra metadata reported by the executor
    pub extra: Map<String, Value>,
}

impl ResultMeta {
    pub const RESERVED_KEYS: [&'static str; 3] = ["executorType", "duration", "executedWith"];

    pub fn new(executor_type: impl Into<String>) -> Self {
        Self {
            executor_type: executor_type.into(),
            duration: None,
            executed_with: None,
            extra: Map::new(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    /// Attach executor metadata, minus the reserved keys
    pub fn with_extra(mut self, mut extra: Map<String, Value>) -> Self {
        for key in Self::RESERVED_KEYS {
            extra.remove(key);
        }
        self.extra = extra;
        self
    }

    pub fn to_value(&self) -> Value {
        let mut object = self.extra.clone();
        object.insert(
            "executorType".to_string(),
            Value::String(self.executor_type.clone()),
        );
        if let Some(duration) = self.duration {
            object.insert("duration".to_string(), Value::from(duration));
        }
        if let Some(runtime) = &self.executed_with {
            object.insert("executedWith".to_string(), Value::String(runtime.clone()));
        }
        Value::Object(object)
    }
}

/// Final output of the pipeline; the body is always JSON
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    pub status: u16,
    pub body: Value,
    pub meta: Option<ResultMeta>,
}

impl InvocationResult {
    pub fn new(status: u16, body: Value, meta: Option<ResultMeta>) -> Self {
        Self { status, body, meta }
    }

    /// `{ error }` for failures before an executor was chosen
    pub fn from_error(err: &GatewayError) -> Self {
        Self::new(
            err.status().as_u16(),
            json!({ "error": err.public_message() }),
            None,
        )
    }

    /// `{ error, _meta }` for failures attributed to an executor type
    pub fn from_executor_error(err: &GatewayError, meta: ResultMeta) -> Self {
        Self::new(
            err.status().as_u16(),
            json!({ "error": err.public_message(), "_meta": meta.to_value() }),
            Some(meta),
        )
    }

    /// Value for the `X-Execution-Time` header, when execution started
    pub fn execution_time(&self) -> Option<u64> {
        self.meta.as_ref().and_then(|meta| meta.duration)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
