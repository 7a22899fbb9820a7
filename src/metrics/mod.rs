//! Cache Metrics System
//!
//! Every cache keeps a small set of counters, updated under the same lock as
//! the operation being counted, and reports them through the [`CacheMetrics`]
//! trait as a `BTreeMap<String, f64>`.
//!
//! # Why BTreeMap over HashMap?
//!
//! Metrics always come out in the same order, which keeps test assertions,
//! log lines and benchmark comparisons reproducible. There are only a couple
//! dozen keys, so the O(log n) lookup is irrelevant.

use std::collections::BTreeMap;

pub mod gdsf;
pub mod lfu;
pub mod lru;

pub use gdsf::GdsfCacheMetrics;
pub use lfu::LfuCacheMetrics;
pub use lru::LruCacheMetrics;

/// Common metrics tracked by all cache algorithms
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of `get` calls
    pub requests: u64,

    /// Number of `get` calls that found their key
    pub cache_hits: u64,

    /// Total bytes returned by hits
    pub bytes_served_from_cache: u64,

    /// Total bytes admitted into the cache
    pub bytes_written_to_cache: u64,

    /// Number of values admitted
    pub admissions: u64,

    /// Number of entries evicted to make room for admissions
    pub evictions: u64,

    /// Bytes currently stored
    pub cache_size_bytes: u64,

    /// Configured byte budget
    pub max_cache_size_bytes: u64,
}

impl CoreCacheMetrics {
    /// Creates a new CoreCacheMetrics instance with the specified byte budget
    pub fn new(max_cache_size_bytes: u64) -> Self {
        Self {
            max_cache_size_bytes,
            ..Default::default()
        }
    }

    /// Records a hit that served `object_size` bytes
    pub fn record_hit(&mut self, object_size: u64) {
        self.requests += 1;
        self.cache_hits += 1;
        self.bytes_served_from_cache += object_size;
    }

    /// Records a miss. Misses are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records an admission of `object_size` bytes
    pub fn record_insertion(&mut self, object_size: u64) {
        self.admissions += 1;
        self.cache_size_bytes += object_size;
        self.bytes_written_to_cache += object_size;
    }

    /// Records a capacity eviction of `evicted_size` bytes
    pub fn record_eviction(&mut self, evicted_size: u64) {
        self.evictions += 1;
        self.cache_size_bytes = self.cache_size_bytes.saturating_sub(evicted_size);
    }

    /// Records an entry leaving the cache for a reason other than capacity
    /// (replacement or explicit removal)
    pub fn record_removal(&mut self, removed_size: u64) {
        self.cache_size_bytes = self.cache_size_bytes.saturating_sub(removed_size);
    }

    /// Resets the stored-bytes gauge after `clear`
    pub fn record_clear(&mut self) {
        self.cache_size_bytes = 0;
    }

    /// Fraction of requests that hit, or 0.0 before the first request
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of requests that missed, or 0.0 before the first request
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Stored bytes relative to the budget. May exceed 1.0 for LRU and LFU,
    /// which tolerate drifting over budget.
    pub fn cache_utilization(&self) -> f64 {
        if self.max_cache_size_bytes > 0 {
            self.cache_size_bytes as f64 / self.max_cache_size_bytes as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("admissions".to_string(), self.admissions as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics.insert(
            "bytes_served_from_cache".to_string(),
            self.bytes_served_from_cache as f64,
        );
        metrics.insert(
            "bytes_written_to_cache".to_string(),
            self.bytes_written_to_cache as f64,
        );

        metrics.insert("cache_size_bytes".to_string(), self.cache_size_bytes as f64);
        metrics.insert(
            "max_cache_size_bytes".to_string(),
            self.max_cache_size_bytes as f64,
        );
        metrics.insert("cache_utilization".to_string(), self.cache_utilization());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Trait that all caches implement for metrics reporting
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification ("LRU", "LFU", "GDSF")
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_metrics_accounting() {
        let mut m = CoreCacheMetrics::new(100);
        m.record_insertion(50);
        m.record_insertion(40);
        m.record_hit(50);
        m.record_miss();
        m.record_eviction(50);
        m.record_removal(40);

        assert_eq!(m.admissions, 2);
        assert_eq!(m.evictions, 1);
        assert_eq!(m.cache_size_bytes, 0);
        assert_eq!(m.bytes_written_to_cache, 90);
        assert_eq!(m.hit_rate(), 0.5);
        assert_eq!(m.miss_rate(), 0.5);
    }

    #[test]
    fn test_btreemap_keys_are_sorted() {
        let mut m = CoreCacheMetrics::new(10);
        m.record_insertion(5);
        let map = m.to_btreemap();

        let keys: Vec<_> = map.keys().cloned().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(map["cache_utilization"], 0.5);
        assert!(!map.contains_key("eviction_rate"));
    }
}
