//! Redis backend implementation.

use super::StoreBackend;
use crate::error::{Error, Result};
use deadpool_redis::redis::{self, AsyncCommands};
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use std::time::Duration;

const DEFAULT_URL: &str = "redis://127.0.0.1:6379";

/// Default Redis connection pool size.
/// Override with REDIS_POOL_SIZE environment variable
const DEFAULT_POOL_SIZE: usize = 16;

/// Configuration for Redis backend.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
    pub pool_size: usize,
    pub connection_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            url: DEFAULT_URL.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    /// Build configuration from `REDIS_URL` and `REDIS_POOL_SIZE`.
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let pool_size = std::env::var("REDIS_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        RedisConfig {
            url,
            pool_size,
            ..Default::default()
        }
    }
}

/// Redis store behind a `deadpool-redis` connection pool.
///
/// `flush` issues `FLUSHDB`, so only the database selected by the URL is
/// cleared.
///
/// # Example
///
/// ```no_run
/// # use counted_cache::backend::{RedisBackend, RedisConfig, StoreBackend};
/// # use counted_cache::error::Result;
/// # async fn example() -> Result<()> {
/// let backend = RedisBackend::new(RedisConfig::from_env()).await?;
/// backend.set("key", b"value".to_vec()).await?;
/// let value = backend.get("key").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool,
}

impl RedisBackend {
    /// Create new Redis backend and verify the server answers `PING`.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` for an unusable URL and
    /// `Error::ConnectionError` when the server cannot be reached.
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let mut pool_config = PoolConfig::new(config.pool_size);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pool_config.timeouts.create = Some(config.connection_timeout);

        let mut cfg = Config::from_url(config.url.clone());
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::ConfigError(format!("Failed to create connection pool: {}", e)))?;

        let backend = RedisBackend { pool };
        let mut conn = backend.pool.get().await.map_err(|e| {
            Error::ConnectionError(format!("Failed to connect to Redis at {}: {}", config.url, e))
        })?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| {
                Error::ConnectionError(format!("Redis at {} did not answer PING: {}", config.url, e))
            })?;

        info!(
            "✓ Redis backend initialized with server: {} (pool size: {})",
            config.url, config.pool_size
        );

        Ok(backend)
    }

    /// Create from a Redis URL with the default pool settings.
    pub async fn from_url(url: impl Into<String>) -> Result<Self> {
        Self::new(RedisConfig {
            url: url.into(),
            ..Default::default()
        })
        .await
    }

    async fn connection(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| Error::BackendError(format!("Failed to get Redis connection: {}", e)))
    }
}

impl StoreBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;

        let value: Option<Vec<u8>> = conn.get(key).await.map_err(|e| {
            Error::BackendError(format!("Redis GET failed for key {}: {}", key, e))
        })?;

        if value.is_some() {
            debug!("✓ Redis GET {} -> HIT", key);
        } else {
            debug!("✓ Redis GET {} -> MISS", key);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.connection().await?;

        conn.set::<_, _, ()>(key, value).await.map_err(|e| {
            Error::BackendError(format!("Redis SET failed for key {}: {}", key, e))
        })?;

        debug!("✓ Redis SET {}", key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.connection().await?;

        let value: i64 = conn.incr(key, 1_i64).await.map_err(|e| {
            Error::BackendError(format!("Redis INCR failed for key {}: {}", key, e))
        })?;

        debug!("✓ Redis INCR {} -> {}", key, value);
        Ok(value)
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::BackendError(format!("Redis FLUSHDB failed: {}", e)))?;

        warn!("⚠ Redis FLUSHDB executed - all keys cleared!");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        match self.pool.get().await {
            Ok(mut conn) => Ok(redis::cmd("PING")
                .query_async::<String>(&mut conn)
                .await
                .is_ok()),
            Err(_) => Ok(false),
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
