//! Executor that forwards invocations to a remote engine over HTTP

use super::{Executor, ExecutorError, ExecutorOutput, Invocation};
use crate::config::models::ExecutorConfig;
use crate::core::registry::FunctionType;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;

/// Engine client for one function type
///
/// The engine receives `{ descriptor, input, source, request }` and answers with
/// either a JSON result (`{ result, executedWith?, ... }` or any JSON value),
/// a non-JSON payload, or `202 { taskId }` for deferred work.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    name: String,
    endpoint: String,
    client: reqwest::Client,
}

impl HttpExecutor {
    pub fn new(function_type: FunctionType, endpoint: &str, config: &ExecutorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| GatewayError::config(format!("Invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| GatewayError::config(format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: format!("{}-engine", function_type),
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        invocation: Invocation<'_>,
    ) -> std::result::Result<ExecutorOutput, ExecutorError> {
        let payload = json!({
            "descriptor": invocation.descriptor,
            "input": invocation.input,
            "source": invocation.source,
            "request": invocation.request,
        });

        debug!(
            function = %invocation.descriptor.id,
            endpoint = %self.endpoint,
            "Forwarding invocation to engine"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !(200..300).contains(&status) {
            return Err(map_http_error(status, &String::from_utf8_lossy(&body)));
        }

        let is_json = content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return Ok(ExecutorOutput::Http {
                status,
                content_type,
                body,
            });
        }

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| ExecutorError::Failed(format!("Engine returned invalid JSON: {}", e)))?;

        if status == 202 {
            if let Some(task_id) = value.get("taskId").and_then(Value::as_str) {
                return Ok(ExecutorOutput::deferred(task_id));
            }
        }

        Ok(split_result(value))
    }
}

/// `{ result, executedWith, ...meta }` becomes a value with metadata;
/// anything else is the result itself
fn split_result(value: Value) -> ExecutorOutput {
    match value {
        Value::Object(mut object) if object.contains_key("result") => {
            let result = object.remove("result").unwrap_or(Value::Null);
            let executed_with = match object.remove("executedWith") {
                Some(Value::String(runtime)) => Some(runtime),
                _ => None,
            };
            let meta = match object.remove("_meta") {
                Some(Value::Object(meta)) => meta,
                _ => Map::new(),
            };
            ExecutorOutput::Value {
                result,
                executed_with,
                meta,
            }
        }
        other => ExecutorOutput::value(other),
    }
}

fn map_transport_error(err: reqwest::Error) -> ExecutorError {
    if err.is_timeout() {
        ExecutorError::Timeout(format!("Engine timed out: {}", err))
    } else if err.is_connect() {
        ExecutorError::Unavailable(format!("Engine unreachable: {}", err))
    } else {
        ExecutorError::Failed(format!("Engine request failed: {}", err))
    }
}

fn map_http_error(status: u16, body: &str) -> ExecutorError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                format!("HTTP error {}", status)
            } else {
                body.to_string()
            }
        });

    match status {
        501 => ExecutorError::NotImplemented(message),
        502 | 503 => ExecutorError::Unavailable(message),
        408 | 504 => ExecutorError::Timeout(message),
        _ => ExecutorError::Failed(message),
    }
}
