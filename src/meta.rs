//! Algorithm-Specific Metadata Types
//!
//! | Algorithm | Metadata Type | Description |
//! |-----------|---------------|-------------|
//! | LRU       | `()` (none)   | Position in the recency list is implicit |
//! | LFU       | [`LfuMeta`]   | Access count and heap slot |
//! | GDSF      | [`GdsfMeta`]  | Access count, cached priority and heap slot |
//!
//! The heap-based engines order entries through [`HeapEntry`], implemented
//! here for `CacheEntry<LfuMeta>` and `CacheEntry<GdsfMeta>`.
//!
//! ```
//! use blobcache::meta::{GdsfMeta, LfuMeta};
//!
//! let mut lfu = LfuMeta::new(1);
//! assert_eq!(lfu.increment(), 2);
//!
//! let gdsf = GdsfMeta::new(1, 1.0);
//! assert_eq!(gdsf.priority, 1.0);
//! ```

use crate::entry::CacheEntry;
use crate::heap::HeapEntry;
use core::cmp::Ordering;

/// Metadata for LFU cache entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LfuMeta {
    /// Access count. Starts at 1 on admission, +1 on every hit.
    pub frequency: u64,
    /// Current slot in the priority heap's backing array.
    pub heap_index: usize,
}

impl LfuMeta {
    /// Creates LFU metadata with the given initial frequency.
    #[inline]
    pub fn new(frequency: u64) -> Self {
        Self {
            frequency,
            heap_index: 0,
        }
    }

    /// Increments the frequency counter and returns the new value.
    #[inline]
    pub fn increment(&mut self) -> u64 {
        self.frequency += 1;
        self.frequency
    }
}

/// Metadata for GDSF cache entries.
///
/// `priority` is a cached value of the GDSF cost function, recomputed by the
/// cache whenever `frequency` changes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GdsfMeta {
    /// Access count. Starts at 1 on admission, +1 on every hit.
    pub frequency: u64,
    /// Cached priority; lower is evicted first.
    pub priority: f64,
    /// Current slot in the priority heap's backing array.
    pub heap_index: usize,
}

impl GdsfMeta {
    /// Creates GDSF metadata with the given frequency and priority.
    #[inline]
    pub fn new(frequency: u64, priority: f64) -> Self {
        Self {
            frequency,
            priority,
            heap_index: 0,
        }
    }

    /// Increments the frequency counter and returns the new value.
    #[inline]
    pub fn increment(&mut self) -> u64 {
        self.frequency += 1;
        self.frequency
    }
}

// Lower frequency first; among equal frequency the older stamp goes first.
impl HeapEntry for CacheEntry<LfuMeta> {
    #[inline]
    fn heap_index(&self) -> usize {
        self.metadata.heap_index
    }

    #[inline]
    fn set_heap_index(&mut self, index: usize) {
        self.metadata.heap_index = index;
    }

    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        (self.metadata.frequency, self.stamp()) < (other.metadata.frequency, other.stamp())
    }
}

impl HeapEntry for CacheEntry<GdsfMeta> {
    #[inline]
    fn heap_index(&self) -> usize {
        self.metadata.heap_index
    }

    #[inline]
    fn set_heap_index(&mut self, index: usize) {
        self.metadata.heap_index = index;
    }

    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        match self.metadata.priority.total_cmp(&other.metadata.priority) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.stamp() < other.stamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn lfu(frequency: u64, stamp: u64) -> CacheEntry<LfuMeta> {
        CacheEntry::with_metadata(String::new(), Bytes::new(), stamp, LfuMeta::new(frequency))
    }

    fn gdsf(priority: f64, stamp: u64) -> CacheEntry<GdsfMeta> {
        CacheEntry::with_metadata(String::new(), Bytes::new(), stamp, GdsfMeta::new(1, priority))
    }

    #[test]
    fn test_lfu_orders_by_frequency_then_recency() {
        assert!(lfu(1, 9).precedes(&lfu(2, 1)));
        assert!(lfu(3, 1).precedes(&lfu(3, 2)));
        assert!(!lfu(3, 2).precedes(&lfu(3, 1)));
        assert!(!lfu(2, 1).precedes(&lfu(2, 1)));
    }

    #[test]
    fn test_gdsf_orders_by_priority_then_recency() {
        assert!(gdsf(1.0, 9).precedes(&gdsf(2.0, 1)));
        assert!(gdsf(3.0, 1).precedes(&gdsf(3.0, 2)));
        assert!(!gdsf(3.5, 1).precedes(&gdsf(3.0, 2)));
    }

    #[test]
    fn test_increment() {
        let mut meta = GdsfMeta::new(1, 1.0);
        assert_eq!(meta.increment(), 2);
        assert_eq!(meta.frequency, 2);
    }
}
