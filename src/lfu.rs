//! Least Frequently Used Cache Implementation.
//!
//! The LFU cache evicts the entry with the lowest access count. Among entries
//! with the same count, the one accessed longest ago goes first.
//!
//! Entries live in a binary min-heap ordered by `(frequency, last access)`.
//! Each entry remembers its position in the heap's backing array, so a hit
//! bumps the count and re-sifts that one position instead of rebuilding the
//! heap.
//!
//! Like LRU, a put evicts **at most one** entry, and only when the new total
//! would exceed `max_size`. The cache may therefore drift over budget; `put`
//! never fails.
//!
//! | Operation | Time |
//! |-----------|------|
//! | get       | O(log n) |
//! | put       | O(log n) |
//! | has       | O(1) |
//! | remove    | O(log n) |

use crate::arena::SlotId;
use crate::config::LfuCacheConfig;
use crate::entry::CacheEntry;
use crate::error::{ensure_invariant, AdmissionError, InvariantError};
use crate::heap::IndexedHeap;
use crate::listener::{notify, CacheEvent, EvictionCause, SharedListener};
use crate::meta::LfuMeta;
use crate::metrics::{CacheMetrics, LfuCacheMetrics};
use crate::traits::Cache;
use bytes::Bytes;
use core::fmt;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

const ALGORITHM: &str = "LFU";

type LfuEntry = CacheEntry<LfuMeta>;

/// Internal LFU segment containing the actual cache algorithm.
pub(crate) struct LfuSegment {
    config: LfuCacheConfig,
    heap: IndexedHeap<LfuEntry>,
    map: HashMap<String, SlotId>,
    used: u64,
    clock: u64,
    metrics: LfuCacheMetrics,
    listener: Option<SharedListener>,
}

impl LfuSegment {
    pub(crate) fn init(config: LfuCacheConfig, listener: Option<SharedListener>) -> Self {
        LfuSegment {
            config,
            heap: IndexedHeap::new(),
            map: HashMap::new(),
            used: 0,
            clock: 0,
            metrics: LfuCacheMetrics::new(config.max_size),
            listener,
        }
    }

    #[inline]
    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn size(&self) -> u64 {
        self.used
    }

    #[inline]
    pub(crate) fn max_size(&self) -> u64 {
        self.config.max_size
    }

    #[inline]
    pub(crate) fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub(crate) fn frequency(&self, key: &str) -> Option<u64> {
        let id = *self.map.get(key)?;
        self.heap.get(id).map(|entry| entry.metadata.frequency)
    }

    pub(crate) fn get(&mut self, key: &str) -> Option<Bytes> {
        let Some(&id) = self.map.get(key) else {
            self.metrics.core.record_miss();
            notify(self.listener.as_ref(), ALGORITHM, CacheEvent::Miss { key });
            return None;
        };

        let stamp = self.next_stamp();
        let (frequency, size, value) = self.heap.update(id, |entry| {
            let frequency = entry.metadata.increment();
            entry.touch(stamp);
            (frequency, entry.size, entry.value.clone())
        })?;

        self.metrics.record_frequency_hit(size, frequency);
        notify(
            self.listener.as_ref(),
            ALGORITHM,
            CacheEvent::Hit {
                key,
                frequency: Some(frequency),
                priority: None,
            },
        );
        Some(value)
    }

    pub(crate) fn put(&mut self, key: String, value: Bytes) {
        self.detach(key.as_str(), EvictionCause::Replaced);

        let size = value.len() as u64;
        if size.saturating_add(self.used) > self.config.max_size {
            if let Some(victim) = self.heap.pop() {
                self.map.remove(victim.key.as_str());
                self.used -= victim.size;
                self.metrics
                    .record_frequency_eviction(victim.size, victim.metadata.frequency);
                self.notify_evicted(&victim, EvictionCause::Capacity);
            }
        }

        let stamp = self.next_stamp();
        notify(
            self.listener.as_ref(),
            ALGORITHM,
            CacheEvent::Admit { key: &key, size },
        );
        let entry = CacheEntry::with_metadata(key.clone(), value, stamp, LfuMeta::new(1));
        let id = self.heap.push(entry);
        self.map.insert(key, id);
        self.used += size;
        self.metrics.core.record_insertion(size);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Bytes> {
        self.detach(key, EvictionCause::Removed)
            .map(|entry| entry.value)
    }

    fn detach(&mut self, key: &str, cause: EvictionCause) -> Option<LfuEntry> {
        let id = self.map.remove(key)?;
        let entry = self.heap.remove(id)?;
        self.used -= entry.size;
        self.metrics.core.record_removal(entry.size);
        self.notify_evicted(&entry, cause);
        Some(entry)
    }

    fn notify_evicted(&self, entry: &LfuEntry, cause: EvictionCause) {
        notify(
            self.listener.as_ref(),
            ALGORITHM,
            CacheEvent::Evict {
                key: &entry.key,
                size: entry.size,
                frequency: Some(entry.metadata.frequency),
                idle: entry.idle(),
                cause,
            },
        );
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.map.clear();
        self.used = 0;
        self.metrics.core.record_clear();
    }

    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        self.heap.check()?;
        ensure_invariant!(
            self.map.len() == self.heap.len(),
            "lookup table has {} keys but heap has {} entries",
            self.map.len(),
            self.heap.len()
        );

        let mut total = 0u64;
        for (id, entry) in self.heap.iter() {
            ensure_invariant!(
                self.map.get(entry.key.as_str()) == Some(&id),
                "key {:?} is in the heap but not indexed",
                entry.key
            );
            ensure_invariant!(
                entry.metadata.frequency >= 1,
                "key {:?} has zero frequency",
                entry.key
            );
            total += entry.size;
        }
        ensure_invariant!(
            total == self.used,
            "stored size is {} but entries sum to {}",
            self.used,
            total
        );
        Ok(())
    }

    pub(crate) fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    /// Key the next capacity eviction would pick.
    #[cfg(test)]
    fn next_victim(&self) -> Option<String> {
        let id = self.heap.peek()?;
        self.heap.get(id).map(|entry| entry.key.clone())
    }
}

impl fmt::Debug for LfuSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuSegment")
            .field("max_size", &self.config.max_size)
            .field("len", &self.map.len())
            .field("used", &self.used)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// A size-bounded LFU cache of byte blobs.
///
/// # Examples
///
/// ```
/// use blobcache::LfuCache;
///
/// let cache = LfuCache::new(100);
/// cache.put("key1", vec![0u8; 50]);
/// cache.put("key2", vec![0u8; 40]);
/// for _ in 0..3 {
///     cache.get("key1");
/// }
/// cache.get("key2");
///
/// // key2 has the lower access count
/// cache.put("key3", vec![0u8; 30]);
/// assert!(cache.has("key1"));
/// assert!(!cache.has("key2"));
/// ```
pub struct LfuCache {
    segment: RwLock<LfuSegment>,
}

impl LfuCache {
    /// Creates an empty cache holding at most `max_size` bytes of values.
    pub fn new(max_size: u64) -> Self {
        Self::init(LfuCacheConfig { max_size }, None)
    }

    /// Creates an empty cache from a configuration, with an optional event
    /// listener.
    pub fn init(config: LfuCacheConfig, listener: Option<SharedListener>) -> Self {
        LfuCache {
            segment: RwLock::new(LfuSegment::init(config, listener)),
        }
    }

    /// Stores `value` under `key` with an access count of 1, evicting the
    /// least frequently used entry if the new total would exceed `max_size`.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.segment.write().put(key.into(), value.into());
    }

    /// Returns the value for `key` and increments its access count.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.segment.write().get(key)
    }

    /// Returns whether `key` is cached, without counting an access.
    pub fn has(&self, key: &str) -> bool {
        self.segment.read().has(key)
    }

    /// Total bytes currently stored.
    pub fn size(&self) -> u64 {
        self.segment.read().size()
    }

    /// Configured byte budget.
    pub fn max_size(&self) -> u64 {
        self.segment.read().max_size()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.segment.read().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current access count of `key`, without counting an access.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.segment.read().frequency(key)
    }

    /// Removes `key`, returning its value if it was cached.
    pub fn remove(&self, key: &str) -> Option<Bytes> {
        self.segment.write().remove(key)
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.segment.write().clear();
    }

    /// Verifies that the lookup table, heap and size accounting agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.read().check_invariants()
    }
}

impl Cache for LfuCache {
    fn put(&self, key: String, value: Bytes) -> Result<(), AdmissionError> {
        self.segment.write().put(key, value);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Bytes> {
        LfuCache::get(self, key)
    }

    fn has(&self, key: &str) -> bool {
        LfuCache::has(self, key)
    }

    fn size(&self) -> u64 {
        LfuCache::size(self)
    }
}

impl CacheMetrics for LfuCache {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.read().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        ALGORITHM
    }
}

impl fmt::Debug for LfuCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("segment", &*self.segment.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn blob(len: usize) -> Vec<u8> {
        vec![1u8; len]
    }

    #[test]
    fn test_lfu_basic() {
        let cache = LfuCache::new(100);
        cache.put("a", blob(10));
        cache.put("b", blob(20));

        assert_eq!(cache.get("a").map(|v| v.len()), Some(10));
        assert_eq!(cache.get("c"), None);
        assert_eq!(cache.frequency("a"), Some(2));
        assert_eq!(cache.frequency("b"), Some(1));
        assert_eq!(cache.size(), 30);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_frequency_ordering() {
        let cache = LfuCache::new(100);
        cache.put("key1", blob(50));
        cache.put("key2", blob(40));
        for _ in 0..3 {
            cache.get("key1");
        }
        cache.get("key2");

        cache.put("key3", blob(30));
        assert!(cache.has("key1"));
        assert!(!cache.has("key2"));
        assert!(cache.has("key3"));
        assert_eq!(cache.size(), 80);
    }

    #[test]
    fn test_lfu_ties_broken_by_recency() {
        let cache = LfuCache::new(100);
        cache.put("key1", blob(50));
        cache.get("key1");
        cache.get("key1");
        cache.put("key2", blob(40));
        cache.get("key2");
        cache.get("key2");

        assert_eq!(cache.segment.read().next_victim().as_deref(), Some("key1"));
        cache.put("key3", blob(30));
        assert!(!cache.has("key1"));
        assert!(cache.has("key2"));
    }

    #[test]
    fn test_lfu_has_is_not_an_access() {
        let cache = LfuCache::new(100);
        cache.put("a", blob(40));
        cache.put("b", blob(40));
        for _ in 0..5 {
            assert!(cache.has("a"));
        }
        assert_eq!(cache.frequency("a"), Some(1));
        assert_eq!(cache.segment.read().next_victim().as_deref(), Some("a"));
    }

    #[test]
    fn test_lfu_update_existing_resets_frequency() {
        let cache = LfuCache::new(100);
        cache.put("a", blob(10));
        cache.get("a");
        cache.get("a");
        cache.put("a", blob(15));

        assert_eq!(cache.frequency("a"), Some(1));
        assert_eq!(cache.size(), 15);
        assert_eq!(cache.len(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_evicts_at_most_one_per_put() {
        let cache = LfuCache::new(100);
        cache.put("a", blob(40));
        cache.put("b", blob(40));
        cache.put("c", blob(90));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.size(), 130);
        assert!(!cache.has("a"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_remove_and_clear() {
        let cache = LfuCache::new(100);
        cache.put("a", blob(10));
        cache.put("b", blob(10));
        cache.put("c", blob(10));

        assert!(cache.remove("b").is_some());
        assert_eq!(cache.frequency("b"), None);
        cache.check_invariants().unwrap();

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_lfu_metrics() {
        let cache = LfuCache::new(50);
        cache.put("a", blob(30));
        cache.get("a");
        cache.get("a");
        cache.put("b", blob(30));

        let metrics = cache.metrics();
        assert_eq!(metrics["max_frequency"], 3.0);
        assert_eq!(metrics["evictions"], 1.0);
        assert_eq!(metrics["average_evicted_frequency"], 3.0);
        assert_eq!(cache.algorithm_name(), "LFU");
    }

    #[test]
    fn test_lfu_concurrent_access() {
        let cache = Arc::new(LfuCache::new(5_000));
        let mut handles = vec![];

        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("key_{}", (t * 7 + i) % 80);
                    if i % 3 == 0 {
                        cache.put(key, blob(i % 64));
                    } else {
                        let _ = cache.get(&key);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        cache.check_invariants().unwrap();
    }
}
