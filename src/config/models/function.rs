//! Static function registry seed

use crate::core::registry::FunctionDescriptor;
use serde::{Deserialize, Serialize};

/// A function registered at startup, with optional inline source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionEntry {
    #[serde(flatten)]
    pub descriptor: FunctionDescriptor,
    /// Source text for code functions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
