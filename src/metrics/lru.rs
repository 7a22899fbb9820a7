//! LRU Cache Metrics
//!
//! LRU has no algorithm-specific counters beyond the core set.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// LRU-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Clone)]
pub struct LruCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,
}

impl LruCacheMetrics {
    /// Creates a new LruCacheMetrics instance with the specified byte budget
    pub fn new(max_cache_size_bytes: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(max_cache_size_bytes),
        }
    }

    /// Converts LRU metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        self.core.to_btreemap()
    }
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
