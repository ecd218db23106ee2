//! In-process backend backed by a concurrent hash map.

use super::StoreBackend;
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory store for tests, demos and single-process use.
///
/// Clones share the same map, so a second [`Cache`](crate::Cache) built from
/// a clone sees (and flushes) the same data, like two clients of one server.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Number of keys currently stored, counters included.
    pub async fn len(&self) -> usize {
        self.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl StoreBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.store.get(key) {
            Some(entry) => {
                debug!("✓ InMemory GET {} -> HIT", key);
                Ok(Some(entry.value().clone()))
            }
            None => {
                debug!("✓ InMemory GET {} -> MISS", key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.store.insert(key.to_string(), value);
        debug!("✓ InMemory SET {}", key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        // The entry guard holds the shard lock, so read-modify-write is atomic.
        let mut entry = self
            .store
            .entry(key.to_string())
            .or_insert_with(|| b"0".to_vec());

        let current = std::str::from_utf8(entry.value())
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| {
                Error::BackendError(format!(
                    "InMemory INCR failed for key {}: value is not an integer",
                    key
                ))
            })?;

        let next = current.checked_add(1).ok_or_else(|| {
            Error::BackendError(format!(
                "InMemory INCR failed for key {}: increment would overflow",
                key
            ))
        })?;

        *entry.value_mut() = next.to_string().into_bytes();
        debug!("✓ InMemory INCR {} -> {}", key, next);
        Ok(next)
    }

    async fn flush(&self) -> Result<()> {
        self.store.clear();
        warn!("⚠ InMemory FLUSH executed - all keys cleared!");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "inmemory"
    }
}
