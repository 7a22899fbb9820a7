//! LFU Cache Metrics
//!
//! Metrics specific to the LFU (Least Frequently Used) cache algorithm.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// LFU-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Clone)]
pub struct LfuCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Highest access count any entry has reached
    pub max_frequency: u64,

    /// Total frequency increments across all hits
    pub total_frequency_increments: u64,

    /// Sum of access counts of evicted entries
    pub evicted_frequency_total: u64,
}

impl LfuCacheMetrics {
    /// Creates a new LfuCacheMetrics instance with the specified byte budget
    pub fn new(max_cache_size_bytes: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(max_cache_size_bytes),
            max_frequency: 0,
            total_frequency_increments: 0,
            evicted_frequency_total: 0,
        }
    }

    /// Records a hit that raised an entry's count to `new_frequency`
    pub fn record_frequency_hit(&mut self, object_size: u64, new_frequency: u64) {
        self.core.record_hit(object_size);
        self.total_frequency_increments += 1;
        self.max_frequency = self.max_frequency.max(new_frequency);
    }

    /// Records a capacity eviction of an entry with access count `frequency`
    pub fn record_frequency_eviction(&mut self, evicted_size: u64, frequency: u64) {
        self.core.record_eviction(evicted_size);
        self.evicted_frequency_total += frequency;
    }

    /// Mean access count of evicted entries
    pub fn average_evicted_frequency(&self) -> f64 {
        if self.core.evictions > 0 {
            self.evicted_frequency_total as f64 / self.core.evictions as f64
        } else {
            0.0
        }
    }

    /// Converts LFU metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("max_frequency".to_string(), self.max_frequency as f64);
        metrics.insert(
            "total_frequency_increments".to_string(),
            self.total_frequency_increments as f64,
        );
        metrics.insert(
            "average_evicted_frequency".to_string(),
            self.average_evicted_frequency(),
        );

        metrics
    }
}

impl CacheMetrics for LfuCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_tracking() {
        let mut m = LfuCacheMetrics::new(100);
        m.core.record_insertion(10);
        m.record_frequency_hit(10, 2);
        m.record_frequency_hit(10, 3);
        m.record_frequency_eviction(10, 3);

        assert_eq!(m.max_frequency, 3);
        assert_eq!(m.total_frequency_increments, 2);
        assert_eq!(m.average_evicted_frequency(), 3.0);
        assert_eq!(m.to_btreemap()["cache_hits"], 2.0);
    }
}
