//! Executor lookup by function type

use super::{Executor, HttpExecutor, PlaceholderExecutor};
use crate::config::models::ExecutorsConfig;
use crate::core::registry::FunctionType;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};
use tracing::info;

/// An executor and its optional concurrency cap
#[derive(Debug, Clone)]
pub struct ExecutorSlot {
    executor: Arc<dyn Executor>,
    permits: Option<Arc<Semaphore>>,
}

impl ExecutorSlot {
    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    /// Wait for a free execution slot; uncapped slots return immediately
    pub async fn acquire(&self) -> std::result::Result<Option<OwnedSemaphorePermit>, AcquireError> {
        match &self.permits {
            Some(permits) => permits.clone().acquire_owned().await.map(Some),
            None => Ok(None),
        }
    }

    pub fn available_permits(&self) -> Option<usize> {
        self.permits.as_ref().map(|p| p.available_permits())
    }
}

/// Executors keyed by the function type they serve
#[derive(Debug, Clone, Default)]
pub struct ExecutorSet {
    slots: HashMap<FunctionType, ExecutorSlot>,
}

impl ExecutorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every known type gets an engine client if one is configured, a placeholder otherwise
    pub fn from_config(config: &ExecutorsConfig) -> Result<Self> {
        let mut set = Self::new();
        for function_type in FunctionType::ALL {
            let settings = config.get(&function_type).cloned().unwrap_or_default();
            let executor: Arc<dyn Executor> = match settings.endpoint.as_deref() {
                Some(endpoint) => {
                    info!("Executor for {} functions: {}", function_type, endpoint);
                    Arc::new(HttpExecutor::new(function_type, endpoint, &settings)?)
                }
                None => Arc::new(PlaceholderExecutor::new(function_type)),
            };
            set.insert(function_type, executor, settings.max_concurrency);
        }
        Ok(set)
    }

    /// Register or replace the executor for a type
    pub fn insert(
        &mut self,
        function_type: FunctionType,
        executor: Arc<dyn Executor>,
        max_concurrency: Option<usize>,
    ) {
        let permits = max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        self.slots
            .insert(function_type, ExecutorSlot { executor, permits });
    }

    pub fn with(
        mut self,
        function_type: FunctionType,
        executor: Arc<dyn Executor>,
        max_concurrency: Option<usize>,
    ) -> Self {
        self.insert(function_type, executor, max_concurrency);
        self
    }

    pub fn get(&self, function_type: FunctionType) -> Option<&ExecutorSlot> {
        self.slots.get(&function_type)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
