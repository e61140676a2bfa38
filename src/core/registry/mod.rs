//! Function registry client
//!
//! Descriptors and source text are owned by an external key-value store; the
//! gateway only reads them through [`FunctionRegistry`].

mod memory;
mod types;


pub use memory::InMemoryRegistry;
pub use types::{FunctionDescriptor, FunctionType};

use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// Read access to registered functions
#[async_trait]
pub trait FunctionRegistry: Send + Sync + Debug {
    /// Look up a descriptor; `version = None` resolves the latest registration
    async fn get(&self, id: &str, version: Option<&str>) -> Result<Option<FunctionDescriptor>>;

    /// Source text for a code function
    async fn get_source(&self, id: &str, version: Option<&str>) -> Result<Option<String>>;
}
