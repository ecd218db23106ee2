//! # counted-cache
//!
//! A small key-value cache over an external store.
//!
//! ## Features
//!
//! - **Generated keys:** every stored value gets a fresh UUID v4 key
//! - **Call counting:** `store` bumps a per-operation counter kept in the same store
//! - **Typed reads:** raw bytes, text, integers, floats or JSON via pluggable converters
//! - **Backend agnostic:** in-memory, Redis and Memcached backends behind one trait
//!
//! Creating a [`Cache`] flushes the backing store.
//!
//! ## Quick Start
//!
//! ```
//! use counted_cache::{Cache, backend::InMemoryBackend};
//!
//! # async fn example() -> counted_cache::Result<()> {
//! let cache = Cache::new(InMemoryBackend::new()).await?;
//!
//! let greeting = cache.store("hello").await?;
//! let answer = cache.store(42).await?;
//!
//! assert_eq!(cache.get_str(&greeting).await?, Some("hello".to_string()));
//! assert_eq!(cache.get_int(&answer).await?, Some(42));
//! assert_eq!(cache.get_str("nonexistent-key").await?, None);
//! assert_eq!(cache.call_count("store").await?, 2);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod cache;
pub mod convert;
pub mod counter;
pub mod error;
pub mod observability;
pub mod value;

// Re-exports for convenience
pub use backend::StoreBackend;
pub use cache::Cache;
pub use convert::Converter;
pub use counter::{count_calls, CallCounter};
pub use error::{Error, Result};
pub use observability::{CacheMetrics, CallStats};
pub use value::{Json, StoreValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
