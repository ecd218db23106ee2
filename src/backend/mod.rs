//! Backing store abstraction and implementations.
//!
//! A backend only needs four commands: `get`, `set`, `incr` and `flush`.
//! Any key-value service exposing them can sit behind a [`Cache`](crate::Cache).

use crate::error::Result;
use std::future::Future;

#[cfg(feature = "inmemory")]
mod inmemory;
#[cfg(feature = "memcached")]
mod memcached;
#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryBackend;
#[cfg(feature = "memcached")]
pub use memcached::{MemcachedBackend, MemcachedConfig};
#[cfg(feature = "redis")]
pub use self::redis::{RedisBackend, RedisConfig};

/// Byte-oriented key-value store consumed by the cache.
///
/// Implementations must be cheap to clone (connection pools, `Arc`s) and
/// safe to share between tasks.
pub trait StoreBackend: Send + Sync + Clone {
    /// Fetch the raw value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    /// Increment the integer counter under `key` by one and return the new value.
    ///
    /// A missing key counts as `0`, so the first increment yields `1`.
    fn incr(&self, key: &str) -> impl Future<Output = Result<i64>> + Send;

    /// Delete every key in the store.
    fn flush(&self) -> impl Future<Output = Result<()>> + Send;

    /// Check that the store answers.
    fn health_check(&self) -> impl Future<Output = Result<bool>> + Send {
        async { Ok(true) }
    }

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}
