//! GDSF Cache Metrics
//!
//! Metrics specific to the GDSF (Greedy Dual-Size Frequency) cache algorithm:
//! inflation (the aging floor `L`), eviction batches and refused admissions.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// GDSF-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Clone)]
pub struct GdsfCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Current inflation value `L`
    pub inflation: f64,

    /// Number of times `L` was raised after an eviction batch
    pub total_aging_events: u64,

    /// Number of puts that evicted at least one entry
    pub eviction_batches: u64,

    /// Largest number of entries evicted by a single put
    pub max_batch_size: u64,

    /// Number of puts refused because the eviction budget was insufficient
    pub rejected_admissions: u64,

    /// Total bytes of refused values
    pub rejected_bytes: u64,
}

impl GdsfCacheMetrics {
    /// Creates a new GdsfCacheMetrics instance
    pub fn new(max_cache_size_bytes: u64, initial_inflation: f64) -> Self {
        Self {
            core: CoreCacheMetrics::new(max_cache_size_bytes),
            inflation: initial_inflation,
            total_aging_events: 0,
            eviction_batches: 0,
            max_batch_size: 0,
            rejected_admissions: 0,
            rejected_bytes: 0,
        }
    }

    /// Records a completed eviction batch and the resulting inflation value
    pub fn record_batch(&mut self, batch_size: u64, new_inflation: f64) {
        self.eviction_batches += 1;
        self.max_batch_size = self.max_batch_size.max(batch_size);
        if new_inflation > self.inflation {
            self.total_aging_events += 1;
        }
        self.inflation = new_inflation;
    }

    /// Records a refused admission
    pub fn record_rejection(&mut self, size: u64) {
        self.rejected_admissions += 1;
        self.rejected_bytes += size;
    }

    /// Mean number of entries evicted per batch
    pub fn average_batch_size(&self) -> f64 {
        if self.eviction_batches > 0 {
            self.core.evictions as f64 / self.eviction_batches as f64
        } else {
            0.0
        }
    }

    /// Converts GDSF metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("inflation".to_string(), self.inflation);
        metrics.insert(
            "total_aging_events".to_string(),
            self.total_aging_events as f64,
        );
        metrics.insert("eviction_batches".to_string(), self.eviction_batches as f64);
        metrics.insert("max_batch_size".to_string(), self.max_batch_size as f64);
        metrics.insert("average_batch_size".to_string(), self.average_batch_size());
        metrics.insert(
            "rejected_admissions".to_string(),
            self.rejected_admissions as f64,
        );
        metrics.insert("rejected_bytes".to_string(), self.rejected_bytes as f64);

        metrics
    }
}

impl CacheMetrics for GdsfCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "GDSF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_and_aging() {
        let mut m = GdsfCacheMetrics::new(100, 0.0);
        m.core.record_eviction(0);
        m.core.record_eviction(0);
        m.record_batch(2, 3.0);
        m.record_batch(1, 3.0);
        m.record_rejection(90);

        assert_eq!(m.eviction_batches, 2);
        assert_eq!(m.max_batch_size, 2);
        assert_eq!(m.total_aging_events, 1);
        assert_eq!(m.inflation, 3.0);
        assert_eq!(m.rejected_bytes, 90);
        assert_eq!(m.average_batch_size(), 1.0);
    }
}
