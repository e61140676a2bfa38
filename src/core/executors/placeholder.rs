//! Executor for types with no engine behind them

use super::{Executor, ExecutorError, ExecutorOutput, Invocation};
use crate::core::registry::FunctionType;
use async_trait::async_trait;

/// Answers every call with "not yet available"
#[derive(Debug, Clone)]
pub struct PlaceholderExecutor {
    function_type: FunctionType,
}

impl PlaceholderExecutor {
    pub fn new(function_type: FunctionType) -> Self {
        Self { function_type }
    }
}

#[async_trait]
impl Executor for PlaceholderExecutor {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn execute(&self, invocation: Invocation<'_>) -> Result<ExecutorOutput, ExecutorError> {
        Err(ExecutorError::NotImplemented(format!(
            "{} functions are not yet available (function '{}')",
            self.function_type, invocation.descriptor.id
        )))
    }
}
