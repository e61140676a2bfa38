//! Invocation dispatcher implementation

use super::body::parse_body;
use super::envelope;
use super::types::{InvocationRequest, InvocationResult, RawRequest, ResultMeta};
use crate::config::models::DispatcherConfig;
use crate::core::executors::{ExecutorError, ExecutorSet, Invocation};
use crate::core::registry::{FunctionDescriptor, FunctionRegistry, FunctionType};
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout_at;
use tracing::{debug, error, warn};

/// Routes admitted invocations to executors and normalizes their results
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<dyn FunctionRegistry>,
    executors: Arc<ExecutorSet>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<dyn FunctionRegistry>,
        executors: ExecutorSet,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            registry,
            executors: Arc::new(executors),
            config,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn executors(&self) -> &ExecutorSet {
        &self.executors
    }

    /// Run the whole pipeline for one request. Never fails: errors become
    /// JSON results with the matching status.
    pub async fn dispatch(
        &self,
        function_id: &str,
        version: Option<&str>,
        request: &RawRequest,
    ) -> InvocationResult {
        match self.try_dispatch(function_id, version, request).await {
            Ok(result) => result,
            Err(e) => {
                match &e {
                    GatewayError::NotFound(_) | GatewayError::BadRequest(_) => {
                        debug!(function = %function_id, "Invocation rejected: {}", e)
                    }
                    _ => error!(function = %function_id, "Invocation failed: {}", e),
                }
                InvocationResult::from_error(&e)
            }
        }
    }

    async fn try_dispatch(
        &self,
        function_id: &str,
        version: Option<&str>,
        request: &RawRequest,
    ) -> Result<InvocationResult> {
        let descriptor = self.resolve(function_id, version).await?;
        let invocation = self.prepare(&descriptor, version, request)?;
        Ok(self.execute(&descriptor, &invocation, request).await)
    }

    /// Look up the descriptor; no version means the latest registration
    pub async fn resolve(&self, function_id: &str, version: Option<&str>) -> Result<FunctionDescriptor> {
        let version = version.filter(|v| !v.is_empty());
        self.registry
            .get(function_id, version)
            .await?
            .ok_or_else(|| GatewayError::function_not_found(function_id))
    }

    /// Parse the body into the normalized invocation input
    pub fn prepare(
        &self,
        descriptor: &FunctionDescriptor,
        version: Option<&str>,
        request: &RawRequest,
    ) -> Result<InvocationRequest> {
        let (body, content_kind) = parse_body(request)?;
        Ok(InvocationRequest {
            function_id: descriptor.id.clone(),
            version: version.map(str::to_string),
            params: request.query.clone(),
            body,
            content_kind,
        })
    }

    /// Select the executor, run it under the time budget and build the envelope
    pub async fn execute(
        &self,
        descriptor: &FunctionDescriptor,
        invocation: &InvocationRequest,
        request: &RawRequest,
    ) -> InvocationResult {
        let type_name = descriptor.type_name().to_string();

        let Some(function_type) = descriptor.function_type() else {
            warn!(function = %descriptor.id, "Unsupported function type: {}", type_name);
            let err = GatewayError::not_implemented(format!(
                "Function type '{}' is not implemented",
                type_name
            ));
            return InvocationResult::from_executor_error(&err, ResultMeta::new(type_name));
        };

        let Some(slot) = self.executors.get(function_type) else {
            let err = GatewayError::unavailable(format!(
                "No executor available for {} functions",
                function_type
            ));
            return InvocationResult::from_executor_error(&err, ResultMeta::new(type_name));
        };

        let source = match self.source_for(descriptor, function_type).await {
            Ok(source) => source,
            Err(e) => {
                error!(function = %descriptor.id, "Failed to load function source: {}", e);
                return InvocationResult::from_executor_error(&e, ResultMeta::new(type_name));
            }
        };

        let budget = self.config.execution_budget(descriptor.timeout_ms);
        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + budget;
        let elapsed_ms = || started.elapsed().as_millis() as u64;

        let permit = match timeout_at(deadline, slot.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(e)) => {
                let meta = ResultMeta::new(type_name).with_duration(elapsed_ms());
                return InvocationResult::from_executor_error(&e.into(), meta);
            }
            Err(_) => {
                warn!(
                    function = %descriptor.id,
                    budget_ms = budget.as_millis() as u64,
                    "Timed out waiting for an execution slot"
                );
                let err = GatewayError::timeout(format!(
                    "Function '{}' timed out after {}ms before execution started",
                    descriptor.id,
                    budget.as_millis()
                ));
                let meta = ResultMeta::new(type_name).with_duration(elapsed_ms());
                return InvocationResult::from_executor_error(&err, meta);
            }
        };

        let executor = slot.executor();
        let call = Invocation {
            descriptor,
            input: &invocation.body,
            request,
            source: source.as_deref(),
        };
        let outcome = timeout_at(deadline, executor.execute(call)).await;
        drop(permit);

        let meta = ResultMeta::new(type_name).with_duration(elapsed_ms());
        match outcome {
            Ok(Ok(output)) => {
                debug!(
                    function = %descriptor.id,
                    executor = executor.name(),
                    duration_ms = meta.duration,
                    "Invocation completed"
                );
                envelope::build(output, meta, executor.name())
            }
            Ok(Err(ExecutorError::NotImplemented(message))) => {
                debug!(function = %descriptor.id, "Executor not implemented: {}", message);
                InvocationResult::from_executor_error(&GatewayError::not_implemented(message), meta)
            }
            Ok(Err(e)) => {
                warn!(function = %descriptor.id, "Executor failed: {}", e);
                InvocationResult::from_executor_error(&e.into(), meta)
            }
            Err(_) => {
                warn!(
                    function = %descriptor.id,
                    budget_ms = budget.as_millis() as u64,
                    "Execution timed out"
                );
                let err = GatewayError::gateway_timeout(format!(
                    "Function '{}' timed out after {}ms",
                    descriptor.id,
                    budget.as_millis()
                ));
                InvocationResult::from_executor_error(&err, meta)
            }
        }
    }

    async fn source_for(
        &self,
        descriptor: &FunctionDescriptor,
        function_type: FunctionType,
    ) -> Result<Option<String>> {
        if function_type != FunctionType::Code {
            return Ok(None);
        }
        self.registry
            .get_source(&descriptor.id, Some(&descriptor.version))
            .await
    }
}
