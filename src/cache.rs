//! Cache - generated keys, counted writes, typed reads.

use crate::backend::StoreBackend;
use crate::convert;
use crate::counter::{qualified_name, CallCounter};
use crate::error::Result;
use crate::observability::{CacheMetrics, CallStats, NoOpMetrics};
use crate::value::StoreValue;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Key-value cache over a [`StoreBackend`].
///
/// Every [`store`](Cache::store) writes under a fresh UUID v4 key and bumps
/// the `"Cache.store"` counter in the same backend. Reads return `Ok(None)`
/// for unknown keys; typed reads apply a converter from [`convert`].
///
/// # Example
///
/// ```
/// use counted_cache::{Cache, backend::InMemoryBackend};
///
/// # async fn example() -> counted_cache::Result<()> {
/// let cache = Cache::new(InMemoryBackend::new()).await?;
///
/// let key = cache.store("hello").await?;
/// assert_eq!(cache.get_str(&key).await?, Some("hello".to_string()));
/// assert_eq!(cache.call_count(Cache::<InMemoryBackend>::STORE).await?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Cache<B: StoreBackend> {
    backend: B,
    metrics: Arc<dyn CacheMetrics>,
}

impl<B: StoreBackend> Cache<B> {
    /// Method name of [`store`](Cache::store), as used by its call counter.
    pub const STORE: &'static str = "store";

    /// Take ownership of a backend connection and flush the store.
    ///
    /// Every key already in the store is deleted, including data written by
    /// other clients sharing it.
    ///
    /// # Errors
    /// Returns `Error::BackendError` or `Error::ConnectionError` when the
    /// flush cannot be executed.
    pub async fn new(backend: B) -> Result<Self> {
        backend.flush().await?;
        info!("✓ Cache ready on {} backend (store flushed)", backend.backend_name());

        Ok(Cache {
            backend,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Counter key for one of this type's operations, e.g. `"Cache.store"`.
    pub fn counter_name(operation: &str) -> String {
        qualified_name::<Self>(operation)
    }

    /// Instrumentation for `operation`, sharing this cache's backend.
    ///
    /// Use it to count calls of operations other than `store`:
    ///
    /// ```
    /// # use counted_cache::{Cache, backend::InMemoryBackend};
    /// # async fn example() -> counted_cache::Result<()> {
    /// let cache = Cache::new(InMemoryBackend::new()).await?;
    /// let key = cache.store(7).await?;
    ///
    /// let value = cache.counter("get_int").call(|| cache.get_int(&key)).await?;
    /// assert_eq!(value, Some(7));
    /// assert_eq!(cache.call_count("get_int").await?, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn counter(&self, operation: &str) -> CallCounter<'_, B> {
        CallCounter::new(&self.backend, Self::counter_name(operation))
    }

    /// Store `data` under a newly generated key and return the key.
    ///
    /// Accepts text, bytes, integers and floats (anything implementing
    /// [`StoreValue`]). The `store` call counter is incremented first; if
    /// that fails the value is not written.
    ///
    /// # Errors
    /// Returns `Error::BackendError` if the counter increment or the write
    /// fails, `Error::SerializationError` if `data` cannot be encoded.
    pub async fn store<V: StoreValue>(&self, data: V) -> Result<String> {
        let counter = self.counter(Self::STORE);

        // Errors are keyed by the counter name: on failure no entry key exists.
        match counter.call(|| self.store_uncounted(data)).await {
            Ok(key) => Ok(key),
            Err(e) => {
                self.metrics.record_error(counter.name(), &e.to_string());
                Err(e)
            }
        }
    }

    async fn store_uncounted<V: StoreValue>(&self, data: V) -> Result<String> {
        let timer = Instant::now();
        let key = Uuid::new_v4().to_string();
        let bytes = data.to_store_bytes()?;

        self.backend.set(&key, bytes).await?;

        self.metrics.record_store(&key, timer.elapsed());
        debug!("✓ Stored value under {}", key);
        Ok(key)
    }

    /// Raw bytes stored under `key`, `None` when absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let timer = Instant::now();

        match self.backend.get(key).await {
            Ok(Some(bytes)) => {
                self.metrics.record_hit(key, timer.elapsed());
                Ok(Some(bytes))
            }
            Ok(None) => {
                self.metrics.record_miss(key, timer.elapsed());
                Ok(None)
            }
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                Err(e)
            }
        }
    }

    /// Value under `key` passed through `converter`, `None` when absent.
    ///
    /// Converter errors are returned as-is.
    ///
    /// ```
    /// # use counted_cache::{Cache, Error, backend::InMemoryBackend};
    /// # async fn example() -> counted_cache::Result<()> {
    /// let cache = Cache::new(InMemoryBackend::new()).await?;
    /// let key = cache.store("a,b,c").await?;
    ///
    /// let parts = cache
    ///     .get_with(&key, |bytes| {
    ///         let text = std::str::from_utf8(bytes)
    ///             .map_err(|e| Error::ConversionError(e.to_string()))?;
    ///         Ok(text.split(',').count())
    ///     })
    ///     .await?;
    /// assert_eq!(parts, Some(3));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_with<T, F>(&self, key: &str, converter: F) -> Result<Option<T>>
    where
        F: FnOnce(&[u8]) -> Result<T>,
    {
        match self.get(key).await? {
            Some(bytes) => converter(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Value under `key` decoded as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, convert::utf8).await
    }

    /// Value under `key` parsed as an integer.
    ///
    /// # Errors
    /// Returns `Error::InvalidInteger` when the stored bytes are not an
    /// integer literal.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, convert::integer).await
    }

    /// Value under `key` parsed as a float.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, convert::float).await
    }

    /// Value under `key` deserialized from JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get_with(key, convert::json::<T>).await
    }

    /// Number of times `operation` has been called since the last flush.
    pub async fn call_count(&self, operation: &str) -> Result<i64> {
        self.counter(operation).count().await
    }

    /// Counters for several operations at once.
    pub async fn call_stats(&self, operations: &[&str]) -> Result<CallStats> {
        let mut stats = CallStats::new();
        for operation in operations {
            let counter = self.counter(operation);
            let count = counter.count().await?;
            stats.push(counter.name(), count);
        }
        Ok(stats)
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
