//! In-process registry seeded from configuration

use super::{FunctionDescriptor, FunctionRegistry};
use crate::config::models::FunctionEntry;
use crate::utils::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

/// Registry holding descriptors under both `id` (latest) and `id@version`
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    descriptors: DashMap<String, FunctionDescriptor>,
    sources: DashMap<String, String>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configured entries, in order
    pub fn from_entries(entries: &[FunctionEntry]) -> Self {
        let registry = Self::new();
        for entry in entries {
            registry.register(entry.descriptor.clone(), entry.source.clone());
        }
        registry
    }

    /// Register a version and make it the latest
    pub fn register(&self, descriptor: FunctionDescriptor, source: Option<String>) {
        let latest = storage_key(&descriptor.id, None);
        self.insert(latest, descriptor.clone(), source.clone());
        self.register_version(descriptor, source);
    }

    /// Register a version without touching the latest pointer
    pub fn register_version(&self, descriptor: FunctionDescriptor, source: Option<String>) {
        let key = storage_key(&descriptor.id, Some(&descriptor.version));
        debug!(function = %key, "Registering function");
        self.insert(key, descriptor, source);
    }

    pub fn len(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|entry| entry.key().contains('@'))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn insert(&self, key: String, descriptor: FunctionDescriptor, source: Option<String>) {
        match source {
            Some(source) => {
                self.sources.insert(key.clone(), source);
            }
            None => {
                self.sources.remove(&key);
            }
        }
        self.descriptors.insert(key, descriptor);
    }
}

#[async_trait]
impl FunctionRegistry for InMemoryRegistry {
    async fn get(&self, id: &str, version: Option<&str>) -> Result<Option<FunctionDescriptor>> {
        Ok(self
            .descriptors
            .get(&storage_key(id, version))
            .map(|entry| entry.value().clone()))
    }

    async fn get_source(&self, id: &str, version: Option<&str>) -> Result<Option<String>> {
        Ok(self
            .sources
            .get(&storage_key(id, version))
            .map(|entry| entry.value().clone()))
    }
}

fn storage_key(id: &str, version: Option<&str>) -> String {
    match version {
        Some(version) if !version.is_empty() => format!("{}@{}", id, version),
        _ => id.to_string(),
    }
}
