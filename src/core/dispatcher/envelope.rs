//! Response envelope construction

use super::types::{InvocationResult, ResultMeta};
use crate::core::executors::ExecutorOutput;
use serde_json::{Value, json};

pub const META_KEY: &str = "_meta";

/// Objects get `_meta` merged in; any other value is wrapped as `{ result }`
pub fn wrap_result(result: Value, meta: Value) -> Value {
    match result {
        Value::Object(mut object) => {
            object.insert(META_KEY.to_string(), meta);
            Value::Object(object)
        }
        other => json!({ "result": other, META_KEY: meta }),
    }
}

/// Turn executor output into the JSON envelope
pub(super) fn build(output: ExecutorOutput, mut meta: ResultMeta, default_runtime: &str) -> InvocationResult {
    match output {
        ExecutorOutput::Value {
            result,
            executed_with,
            meta: extra,
        } => {
            meta = meta.with_extra(extra);
            meta.executed_with = executed_with.or_else(|| Some(default_runtime.to_string()));
            let body = wrap_result(result, meta.to_value());
            InvocationResult::new(200, body, Some(meta))
        }
        ExecutorOutput::Http {
            status,
            content_type,
            body,
        } => {
            meta.executed_with = Some(default_runtime.to_string());
            let text = String::from_utf8_lossy(&body).into_owned();
            let is_json = content_type
                .as_deref()
                .is_some_and(|ct| ct.contains("application/json"));
            let payload = if is_json {
                serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text))
            } else {
                Value::String(text)
            };

            let body = if (200..300).contains(&status) {
                wrap_result(payload, meta.to_value())
            } else {
                match payload {
                    Value::Object(object) => wrap_result(Value::Object(object), meta.to_value()),
                    other => json!({ "error": other, META_KEY: meta.to_value() }),
                }
            };
            InvocationResult::new(status, body, Some(meta))
        }
        ExecutorOutput::Deferred { task_id } => {
            let body = json!({
                "taskId": task_id,
                META_KEY: { "executorType": meta.executor_type },
            });
            InvocationResult::new(202, body, Some(meta))
        }
    }
}
