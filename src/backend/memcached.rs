//! Memcached backend implementation.

use super::StoreBackend;
use crate::error::{Error, Result};
use async_memcached::{AsciiProtocol, Status};
use deadpool_memcached::{Manager, Object, Pool};
use std::time::Duration;

const DEFAULT_SERVER: &str = "localhost:11211";
const DEFAULT_POOL_SIZE: usize = 16;

/// Connection settings for [`MemcachedBackend`].
#[derive(Clone, Debug)]
pub struct MemcachedConfig {
    pub server: String,
    pub pool_size: usize,
    pub connection_timeout: Duration,
}

impl Default for MemcachedConfig {
    fn default() -> Self {
        MemcachedConfig {
            server: DEFAULT_SERVER.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl MemcachedConfig {
    /// Build configuration from `MEMCACHED_SERVER` and `MEMCACHED_POOL_SIZE`.
    pub fn from_env() -> Self {
        let server =
            std::env::var("MEMCACHED_SERVER").unwrap_or_else(|_| DEFAULT_SERVER.to_string());
        let pool_size = std::env::var("MEMCACHED_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        MemcachedConfig {
            server,
            pool_size,
            ..Default::default()
        }
    }
}

/// Memcached store behind a `deadpool-memcached` pool.
///
/// Memcached never creates counters on `incr`, so [`incr`](StoreBackend::incr)
/// seeds missing keys with `add key 0` first.
///
/// ```no_run
/// # use counted_cache::backend::{MemcachedBackend, MemcachedConfig, StoreBackend};
/// # async fn example() -> counted_cache::Result<()> {
/// let backend = MemcachedBackend::new(MemcachedConfig::from_env()).await?;
/// assert_eq!(backend.incr("visits").await?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MemcachedBackend {
    pool: Pool,
}

impl MemcachedBackend {
    /// Build the pool and take one connection so an unreachable server fails
    /// here with `Error::ConnectionError`.
    pub async fn new(config: MemcachedConfig) -> Result<Self> {
        if config.server.is_empty() {
            return Err(Error::ConfigError("No memcached server specified".to_string()));
        }

        let pool = Pool::builder(Manager::new(config.server.clone()))
            .max_size(config.pool_size)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create connection pool: {}", e)))?;

        match tokio::time::timeout(config.connection_timeout, pool.get()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(Error::ConnectionError(format!(
                    "Failed to connect to Memcached at {}: {}",
                    config.server, e
                )))
            }
            Err(_) => {
                return Err(Error::ConnectionError(format!(
                    "Timed out connecting to Memcached at {} after {:?}",
                    config.server, config.connection_timeout
                )))
            }
        }

        info!(
            "✓ Memcached backend initialized with server: {} (pool size: {})",
            config.server, config.pool_size
        );

        Ok(MemcachedBackend { pool })
    }

    async fn connection(&self) -> Result<Object> {
        self.pool.get().await.map_err(|e| {
            Error::BackendError(format!("Failed to get Memcached connection: {}", e))
        })
    }
}

/// `add` answers NOT_STORED when the key already exists.
fn is_not_stored(error: &async_memcached::Error) -> bool {
    matches!(error, async_memcached::Error::Protocol(Status::NotStored))
}

impl StoreBackend for MemcachedBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;

        let value = conn
            .get(key)
            .await
            .map_err(|e| Error::BackendError(format!("Memcached GET failed for key {}: {}", key, e)))?
            .and_then(|value| value.data);

        debug!(
            "✓ Memcached GET {} -> {}",
            key,
            if value.is_some() { "HIT" } else { "MISS" }
        );
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.connection().await?;

        conn.set(key, value.as_slice(), None, None)
            .await
            .map_err(|e| {
                Error::BackendError(format!("Memcached SET failed for key {}: {}", key, e))
            })?;

        debug!("✓ Memcached SET {}", key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.connection().await?;

        match conn.add(key, b"0".as_slice(), None, None).await {
            Ok(()) => debug!("✓ Memcached ADD {} (counter seeded)", key),
            Err(e) if is_not_stored(&e) => {}
            Err(e) => {
                return Err(Error::BackendError(format!(
                    "Memcached ADD failed for key {}: {}",
                    key, e
                )))
            }
        }

        let value = conn.increment(key, 1).await.map_err(|e| {
            Error::BackendError(format!("Memcached INCR failed for key {}: {}", key, e))
        })?;

        let value = i64::try_from(value).map_err(|_| {
            Error::BackendError(format!(
                "Memcached INCR for key {} returned {} which exceeds i64",
                key, value
            ))
        })?;

        debug!("✓ Memcached INCR {} -> {}", key, value);
        Ok(value)
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        conn.flush_all()
            .await
            .map_err(|e| Error::BackendError(format!("Memcached FLUSH_ALL failed: {}", e)))?;

        warn!("⚠ Memcached FLUSH_ALL executed - all keys cleared!");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        let Ok(mut conn) = self.pool.get().await else {
            return Ok(false);
        };
        Ok(conn.get("__health_check__").await.is_ok())
    }

    fn backend_name(&self) -> &'static str {
        "memcached"
    }
}
