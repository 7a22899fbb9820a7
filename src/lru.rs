//! Least Recently Used (LRU) Cache Implementation
//!
//! Entries are kept in recency order in an arena-backed doubly linked list,
//! most recently used at the front. A hash map from key to list handle gives
//! O(1) lookup.
//!
//! # Algorithm
//!
//! ```text
//!   front (MRU)                                   back (LRU)
//!   [ key3 ] <-> [ key1 ] <-> [ key7 ] <-> [ key2 ]
//!        ^ get / put land here        evicted from here ^
//! ```
//!
//! When an admission would push the stored bytes over `max_size`, **exactly
//! one** entry is evicted from the back before the new entry is inserted at
//! the front. A single eviction may not free enough room, in which case the
//! cache is left over budget until later puts evict more. `put` never fails.
//!
//! # Performance Characteristics
//!
//! | Operation | Time |
//! |-----------|------|
//! | get       | O(1) |
//! | put       | O(1) |
//! | has       | O(1) |
//! | remove    | O(1) |
//!
//! # Thread Safety
//!
//! [`LruCache`] wraps its state in a `parking_lot::RwLock`. `put`, `get`,
//! `remove` and `clear` take it exclusively; `has`, `size` and the other read
//! accessors share it.

use crate::arena::SlotId;
use crate::config::LruCacheConfig;
use crate::entry::CacheEntry;
use crate::error::{ensure_invariant, AdmissionError, InvariantError};
use crate::list::List;
use crate::listener::{notify, CacheEvent, EvictionCause, SharedListener};
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use crate::traits::Cache;
use bytes::Bytes;
use core::fmt;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

const ALGORITHM: &str = "LRU";

/// Internal LRU segment containing the actual cache algorithm.
///
/// All mutation goes through `&mut self`; [`LruCache`] provides the locking.
pub(crate) struct LruSegment {
    config: LruCacheConfig,
    list: List<CacheEntry>,
    map: HashMap<String, SlotId>,
    used: u64,
    clock: u64,
    metrics: LruCacheMetrics,
    listener: Option<SharedListener>,
}

impl LruSegment {
    pub(crate) fn init(config: LruCacheConfig, listener: Option<SharedListener>) -> Self {
        LruSegment {
            config,
            list: List::new(),
            map: HashMap::new(),
            used: 0,
            clock: 0,
            metrics: LruCacheMetrics::new(config.max_size),
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

    pub(crate) fn get(&mut self, key: &str) -> Option<Bytes> {
        let Some(&id) = self.map.get(key) else {
            self.metrics.core.record_miss();
            notify(self.listener.as_ref(), ALGORITHM, CacheEvent::Miss { key });
            return None;
        };

        let stamp = self.next_stamp();
        self.list.move_to_front(id);
        let entry = self.list.get_mut(id)?;
        entry.touch(stamp);

        self.metrics.core.record_hit(entry.size);
        notify(
            self.listener.as_ref(),
            ALGORITHM,
            CacheEvent::Hit {
                key,
                frequency: None,
                priority: None,
            },
        );
        Some(entry.value.clone())
    }

    pub(crate) fn put(&mut self, key: String, value: Bytes) {
        self.detach(key.as_str(), EvictionCause::Replaced);

        let size = value.len() as u64;
        if size.saturating_add(self.used) > self.config.max_size {
            if let Some(victim) = self.list.remove_last() {
                self.map.remove(victim.key.as_str());
                self.used -= victim.size;
                self.metrics.core.record_eviction(victim.size);
                self.notify_evicted(&victim, EvictionCause::Capacity);
            }
        }

        let stamp = self.next_stamp();
        notify(
            self.listener.as_ref(),
            ALGORITHM,
            CacheEvent::Admit { key: &key, size },
        );
        let id = self.list.add(CacheEntry::new(key.clone(), value, stamp));
        self.map.insert(key, id);
        self.used += size;
        self.metrics.core.record_insertion(size);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Bytes> {
        self.detach(key, EvictionCause::Removed)
            .map(|entry| entry.value)
    }

    /// Unlinks `key` for a reason other than capacity pressure.
    fn detach(&mut self, key: &str, cause: EvictionCause) -> Option<CacheEntry> {
        let id = self.map.remove(key)?;
        let entry = self.list.remove(id)?;
        self.used -= entry.size;
        self.metrics.core.record_removal(entry.size);
        self.notify_evicted(&entry, cause);
        Some(entry)
    }

    fn notify_evicted(&self, entry: &CacheEntry, cause: EvictionCause) {
        notify(
            self.listener.as_ref(),
            ALGORITHM,
            CacheEvent::Evict {
                key: &entry.key,
                size: entry.size,
                frequency: None,
                idle: entry.idle(),
                cause,
            },
        );
    }

    pub(crate) fn clear(&mut self) {
        self.list.clear();
        self.map.clear();
        self.used = 0;
        self.metrics.core.record_clear();
    }

    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check()?;
        ensure_invariant!(
            self.map.len() == self.list.len(),
            "lookup table has {} keys but recency list has {} entries",
            self.map.len(),
            self.list.len()
        );

        let mut total = 0u64;
        let mut previous_stamp = u64::MAX;
        for (id, entry) in self.list.iter() {
            ensure_invariant!(
                self.map.get(entry.key.as_str()) == Some(&id),
                "key {:?} is listed but not indexed",
                entry.key
            );
            ensure_invariant!(
                entry.stamp() < previous_stamp,
                "recency list out of order at key {:?}",
                entry.key
            );
            previous_stamp = entry.stamp();
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

    /// Keys from most to least recently used.
    #[cfg(test)]
    fn keys(&self) -> Vec<String> {
        self.list.iter().map(|(_, e)| e.key.clone()).collect()
    }
}

impl fmt::Debug for LruSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSegment")
            .field("max_size", &self.config.max_size)
            .field("len", &self.map.len())
            .field("used", &self.used)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// A size-bounded LRU cache of byte blobs.
///
/// # Examples
///
/// ```
/// use blobcache::LruCache;
///
/// let cache = LruCache::new(100);
/// cache.put("key1", vec![0u8; 50]);
/// cache.put("key2", vec![0u8; 40]);
/// assert_eq!(cache.size(), 90);
///
/// // 30 + 90 > 100, so the least recently used entry goes
/// cache.put("key3", vec![0u8; 30]);
/// assert!(!cache.has("key1"));
/// assert_eq!(cache.size(), 70);
/// ```
pub struct LruCache {
    segment: RwLock<LruSegment>,
}

impl LruCache {
    /// Creates an empty cache holding at most `max_size` bytes of values.
    pub fn new(max_size: u64) -> Self {
        Self::init(LruCacheConfig { max_size }, None)
    }

    /// Creates an empty cache from a configuration, with an optional event
    /// listener.
    pub fn init(config: LruCacheConfig, listener: Option<SharedListener>) -> Self {
        LruCache {
            segment: RwLock::new(LruSegment::init(config, listener)),
        }
    }

    /// Stores `value` under `key`, evicting the least recently used entry if
    /// the new total would exceed `max_size`.
    ///
    /// An existing entry for `key` is replaced by a fresh one.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.segment.write().put(key.into(), value.into());
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.segment.write().get(key)
    }

    /// Returns whether `key` is cached, without touching its recency.
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

    /// Removes `key`, returning its value if it was cached.
    pub fn remove(&self, key: &str) -> Option<Bytes> {
        self.segment.write().remove(key)
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.segment.write().clear();
    }

    /// Verifies that the lookup table, recency list and size accounting agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.read().check_invariants()
    }
}

impl Cache for LruCache {
    fn put(&self, key: String, value: Bytes) -> Result<(), AdmissionError> {
        self.segment.write().put(key, value);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Bytes> {
        LruCache::get(self, key)
    }

    fn has(&self, key: &str) -> bool {
        LruCache::has(self, key)
    }

    fn size(&self) -> u64 {
        LruCache::size(self)
    }
}

impl CacheMetrics for LruCache {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.read().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        ALGORITHM
    }
}

impl fmt::Debug for LruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("segment", &*self.segment.read())
            .finish()
    }
}
