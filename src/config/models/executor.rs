//! Executor configuration

use crate::core::registry::FunctionType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Connection settings for one execution engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecutorConfig {
    /// Engine endpoint; without one the type answers 501
    pub endpoint: Option<String>,
    /// Maximum concurrent executions for this type
    pub max_concurrency: Option<usize>,
    /// Transport timeout for engine calls; the dispatcher budget still applies
    pub timeout_ms: Option<u64>,
    /// Extra headers sent with every forwarded invocation
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Executors keyed by the function type they serve
pub type ExecutorsConfig = HashMap<FunctionType, ExecutorConfig>;
