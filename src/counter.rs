//! Call-counting instrumentation.
//!
//! Wraps an operation so every invocation first bumps a counter stored in
//! the same backend, then runs the operation unchanged. The increment and
//! the operation are separate commands: a failing operation still counts as
//! an attempt, and a failing increment aborts the call before the operation
//! runs.

use crate::backend::StoreBackend;
use crate::error::Result;
use std::future::Future;

/// Counter name for `method` on type `T`, e.g. `"Cache.store"`.
///
/// Module path and generic parameters are dropped, so every backend
/// instantiation of the same type shares one counter per method.
pub fn qualified_name<T: ?Sized>(method: &str) -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let type_name = base.rsplit("::").next().unwrap_or(base);
    format!("{}.{}", type_name, method)
}

/// Increment the counter `name`, then run `operation`.
///
/// # Example
///
/// ```
/// # use counted_cache::backend::{InMemoryBackend, StoreBackend};
/// # use counted_cache::counter::count_calls;
/// # async fn example() -> counted_cache::Result<()> {
/// let backend = InMemoryBackend::new();
/// let answer = count_calls(&backend, "Report.build", || async { Ok(42) }).await?;
/// assert_eq!(answer, 42);
/// assert_eq!(backend.get("Report.build").await?, Some(b"1".to_vec()));
/// # Ok(())
/// # }
/// ```
pub async fn count_calls<B, F, Fut, T>(backend: &B, name: &str, operation: F) -> Result<T>
where
    B: StoreBackend,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let calls = backend.incr(name).await?;
    trace!("» {} call #{}", name, calls);
    operation().await
}

/// Reusable instrumentation bound to one backend and one counter name.
pub struct CallCounter<'a, B: StoreBackend> {
    backend: &'a B,
    name: String,
}

impl<'a, B: StoreBackend> CallCounter<'a, B> {
    pub fn new(backend: &'a B, name: impl Into<String>) -> Self {
        CallCounter {
            backend,
            name: name.into(),
        }
    }

    /// Counter key in the backend.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Count one invocation and run `operation`.
    pub async fn call<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        count_calls(self.backend, &self.name, operation).await
    }

    /// Current value of the counter, `0` before the first call.
    pub async fn count(&self) -> Result<i64> {
        match self.backend.get(&self.name).await? {
            Some(bytes) => crate::convert::integer(&bytes),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::error::Error;

    #[allow(dead_code)]
    struct Widget<T>(T);

    #[test]
    fn test_qualified_name_strips_path_and_generics() {
        assert_eq!(qualified_name::<Widget<u8>>("render"), "Widget.render");
        assert_eq!(qualified_name::<String>("len"), "String.len");
    }

    #[test]
    fn test_qualified_names_differ_per_method() {
        assert_ne!(
            qualified_name::<Widget<u8>>("store"),
            qualified_name::<Widget<u8>>("get")
        );
    }

    #[tokio::test]
    async fn test_count_calls_increments_then_runs() {
        let backend = InMemoryBackend::new();
        let backend = &backend;

        for expected in 1..=3 {
            let seen = count_calls(backend, "op", || async move {
                let current = backend.get("op").await?;
                Ok::<_, Error>(current)
            })
            .await
            .expect("Operation failed");

            // The counter is already bumped when the operation runs.
            assert_eq!(seen, Some(expected.to_string().into_bytes()));
        }
    }

    #[tokio::test]
    async fn test_failed_operation_still_counts() {
        let backend = InMemoryBackend::new();
        let counter = CallCounter::new(&backend, "flaky");

        let result: Result<()> = counter
            .call(|| async { Err(Error::ConversionError("boom".to_string())) })
            .await;

        assert!(matches!(result, Err(Error::ConversionError(_))));
        assert_eq!(counter.count().await.expect("Failed to read count"), 1);
    }

    #[tokio::test]
    async fn test_failed_increment_skips_operation() {
        let backend = InMemoryBackend::new();
        backend
            .set("broken", b"not a number".to_vec())
            .await
            .expect("Failed to set");

        let mut ran = false;
        let result = count_calls(&backend, "broken", || {
            ran = true;
            async { Ok(()) }
        })
        .await;

        assert!(matches!(result, Err(Error::BackendError(_))));
        assert!(!ran);
    }

    #[tokio::test]
    async fn test_counters_are_independent() {
        let backend = InMemoryBackend::new();
        let reads = CallCounter::new(&backend, "Cache.get");
        let writes = CallCounter::new(&backend, "Cache.store");

        reads.call(|| async { Ok(()) }).await.expect("Call failed");
        writes.call(|| async { Ok(()) }).await.expect("Call failed");
        writes.call(|| async { Ok(()) }).await.expect("Call failed");

        assert_eq!(reads.count().await.expect("Failed to read count"), 1);
        assert_eq!(writes.count().await.expect("Failed to read count"), 2);
        assert_eq!(writes.name(), "Cache.store");
    }
}
