//! Window counter storage

use super::types::{WindowKey, WindowState};
use crate::utils::error::Result;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt::Debug;

/// Per-key counter storage shared by every request
///
/// Implementations must make `compare_and_swap` atomic for a single key
/// without serializing unrelated keys.
pub trait WindowStore: Send + Sync + Debug {
    fn get(&self, key: &WindowKey) -> Result<Option<WindowState>>;

    fn set(&self, key: WindowKey, state: WindowState) -> Result<()>;

    /// Replace the state for `key` only if it still equals `expected`
    /// (`None` meaning absent). Returns whether the swap happened.
    fn compare_and_swap(
        &self,
        key: &WindowKey,
        expected: Option<WindowState>,
        new: WindowState,
    ) -> Result<bool>;

    /// Drop entries whose window started at least `max_window_ms` before `now_ms`
    fn sweep(&self, now_ms: u64, max_window_ms: u64) -> Result<usize>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sharded in-process store
#[derive(Debug, Default)]
pub struct InMemoryWindowStore {
    entries: DashMap<WindowKey, WindowState>,
}

impl InMemoryWindowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowStore for InMemoryWindowStore {
    fn get(&self, key: &WindowKey) -> Result<Option<WindowState>> {
        Ok(self.entries.get(key).map(|entry| *entry.value()))
    }

    fn set(&self, key: WindowKey, state: WindowState) -> Result<()> {
        self.entries.insert(key, state);
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &WindowKey,
        expected: Option<WindowState>,
        new: WindowState,
    ) -> Result<bool> {
        // The entry guard holds the shard lock for this key only
        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if expected == Some(*occupied.get()) {
                    occupied.insert(new);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                if expected.is_none() {
                    vacant.insert(new);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    fn sweep(&self, now_ms: u64, max_window_ms: u64) -> Result<usize> {
        let before = self.entries.len();
        self.entries
            .retain(|_, state| now_ms.saturating_sub(state.window_start) < max_window_ms);
        Ok(before.saturating_sub(self.entries.len()))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
