//! Execution engines
//!
//! One [`Executor`] per [`FunctionType`](crate::core::registry::FunctionType).
//! The engines themselves run elsewhere; implementations here only forward
//! invocations and translate what comes back.

mod http;
mod placeholder;
mod set;
mod types;


pub use http::HttpExecutor;
pub use placeholder::PlaceholderExecutor;
pub use set::{ExecutorSet, ExecutorSlot};
pub use types::{ExecutorError, ExecutorOutput, Invocation};

use async_trait::async_trait;
use std::fmt::Debug;

/// Runs one invocation of a function
#[async_trait]
pub trait Executor: Send + Sync + Debug {
    /// Reported as `_meta.executedWith` when the output does not name a runtime
    fn name(&self) -> &str;

    async fn execute(&self, invocation: Invocation<'_>) -> Result<ExecutorOutput, ExecutorError>;
}
