//! Metrics hooks and call statistics.

use std::fmt;
use std::time::Duration;

/// Hooks invoked by [`Cache`](crate::Cache) around backend round trips.
///
/// All methods default to no-ops; implement only what you collect.
pub trait CacheMetrics: Send + Sync {
    /// A lookup found a value.
    fn record_hit(&self, _key: &str, _duration: Duration) {}

    /// A lookup found nothing.
    fn record_miss(&self, _key: &str, _duration: Duration) {}

    /// A value was written under a freshly generated key.
    fn record_store(&self, _key: &str, _duration: Duration) {}

    /// A backend command or a conversion failed.
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Metrics sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {}

/// Snapshot of call counters for a set of operations.
///
/// `Display` renders one line per operation:
///
/// ```text
/// 3 calls
/// Operations:
///     Cache.store: 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallStats {
    counts: Vec<(String, i64)>,
}

impl CallStats {
    pub fn new() -> Self {
        CallStats::default()
    }

    pub fn push(&mut self, operation: impl Into<String>, count: i64) {
        self.counts.push((operation.into(), count));
    }

    /// Count recorded for `operation`, if it was part of the snapshot.
    pub fn get(&self, operation: &str) -> Option<i64> {
        self.counts
            .iter()
            .find(|(name, _)| name == operation)
            .map(|(_, count)| *count)
    }

    pub fn total(&self) -> i64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl fmt::Display for CallStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} calls", self.total())?;
        write!(f, "Operations:")?;
        for (name, count) in self.iter() {
            write!(f, "\n\t{}: {}", name, count)?;
        }
        Ok(())
    }
}
