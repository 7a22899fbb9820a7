//! Greedy Dual-Size Frequency (GDSF) cache implementation.
//!
//! GDSF ranks entries by a priority that combines access count, acquisition
//! cost and size, shifted by a global inflation value `L`:
//!
//! ```text
//! priority = L + frequency × cost(size) / size
//! ```
//!
//! The lowest priority is evicted first; equal priorities evict the entry
//! accessed longest ago. With the default [`AcquisitionCost::Size`] the cost
//! equals the size and priority reduces to `L + frequency`. Use
//! [`AcquisitionCost::Constant`] to make size count.
//!
//! # Admission
//!
//! Unlike LRU and LFU, a GDSF put may evict several entries, up to
//! `max_evictions`. The cache picks the smallest number `k` of lowest-priority
//! entries whose removal brings the total within `max_size`. If no `k` within
//! the bound works, the put fails with [`AdmissionError::TooLarge`] and the
//! cache is left exactly as it was. GDSF therefore never exceeds its budget.
//!
//! # Aging
//!
//! After a batch of evictions, `L` is raised to the priority of the last
//! victim. New and freshly hit entries are priced on top of the raised `L`,
//! so long-idle entries with a high historical count eventually lose out.
//! `L` never decreases (except on `clear`).
//!
//! | Operation | Time |
//! |-----------|------|
//! | get       | O(log n) |
//! | put       | O(k² + k log n), k ≤ `max_evictions` |
//! | has       | O(1) |

use crate::arena::SlotId;
use crate::config::{AcquisitionCost, GdsfCacheConfig};
use crate::entry::CacheEntry;
use crate::error::{ensure_invariant, AdmissionError, InvariantError};
use crate::heap::IndexedHeap;
use crate::listener::{notify, CacheEvent, EvictionCause, SharedListener};
use crate::meta::GdsfMeta;
use crate::metrics::{CacheMetrics, GdsfCacheMetrics};
use crate::traits::Cache;
use bytes::Bytes;
use core::fmt;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

const ALGORITHM: &str = "GDSF";

type GdsfEntry = CacheEntry<GdsfMeta>;

/// Priority of an entry with the given access count and size.
#[inline]
fn priority(inflation: f64, cost: AcquisitionCost, frequency: u64, size: u64) -> f64 {
    inflation + frequency as f64 * cost.cost(size) / size.max(1) as f64
}

/// Internal GDSF segment containing the actual cache algorithm.
pub(crate) struct GdsfSegment {
    config: GdsfCacheConfig,
    heap: IndexedHeap<GdsfEntry>,
    map: HashMap<String, SlotId>,
    used: u64,
    inflation: f64,
    clock: u64,
    metrics: GdsfCacheMetrics,
    listener: Option<SharedListener>,
}

impl GdsfSegment {
    pub(crate) fn init(config: GdsfCacheConfig, listener: Option<SharedListener>) -> Self {
        GdsfSegment {
            config,
            heap: IndexedHeap::new(),
            map: HashMap::new(),
            used: 0,
            inflation: config.initial_inflation(),
            clock: 0,
            metrics: GdsfCacheMetrics::new(config.max_size(), config.initial_inflation()),
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
    pub(crate) fn inflation(&self) -> f64 {
        self.inflation
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
        let inflation = self.inflation;
        let cost = self.config.acquisition_cost();
        let (frequency, new_priority, size, value) = self.heap.update(id, |entry| {
            let frequency = entry.metadata.increment();
            entry.metadata.priority = priority(inflation, cost, frequency, entry.size);
            entry.touch(stamp);
            (
                frequency,
                entry.metadata.priority,
                entry.size,
                entry.value.clone(),
            )
        })?;

        self.metrics.core.record_hit(size);
        notify(
            self.listener.as_ref(),
            ALGORITHM,
            CacheEvent::Hit {
                key,
                frequency: Some(frequency),
                priority: Some(new_priority),
            },
        );
        Some(value)
    }

    /// Picks the fewest lowest-priority entries whose eviction lets `size`
    /// more bytes fit, skipping `exclude`. Returns the victims in eviction
    /// order, or the bytes that `max_evictions` victims would free.
    fn select_victims(
        &self,
        size: u64,
        resident: u64,
        exclude: Option<SlotId>,
    ) -> Result<Vec<SlotId>, u64> {
        let max_size = self.config.max_size();
        let max_evictions = self.config.max_evictions();
        let mut victims = Vec::new();
        let mut freed = 0u64;

        if size.saturating_add(resident) <= max_size {
            return Ok(victims);
        }
        for id in self.heap.ascending() {
            if Some(id) == exclude {
                continue;
            }
            if victims.len() == max_evictions {
                break;
            }
            let Some(entry) = self.heap.get(id) else {
                continue;
            };
            victims.push(id);
            freed += entry.size;
            if size.saturating_add(resident - freed) <= max_size {
                return Ok(victims);
            }
        }
        Err(freed)
    }

    pub(crate) fn put(&mut self, key: String, value: Bytes) -> Result<(), AdmissionError> {
        let size = value.len() as u64;
        let replaced = self.map.get(key.as_str()).copied();
        let replaced_size = replaced
            .and_then(|id| self.heap.get(id))
            .map_or(0, |entry| entry.size);
        let resident = self.used - replaced_size;

        let victims = match self.select_victims(size, resident, replaced) {
            Ok(victims) => victims,
            Err(reclaimable) => {
                self.metrics.record_rejection(size);
                notify(
                    self.listener.as_ref(),
                    ALGORITHM,
                    CacheEvent::Reject {
                        key: &key,
                        size,
                        max_evictions: self.config.max_evictions(),
                    },
                );
                return Err(AdmissionError::TooLarge {
                    size,
                    max_evictions: self.config.max_evictions(),
                    reclaimable,
                    max_size: self.config.max_size(),
                });
            }
        };

        if let Some(id) = replaced {
            self.detach(id, EvictionCause::Replaced);
        }

        let mut last_priority = None;
        for id in &victims {
            if let Some(victim) = self.heap.remove(*id) {
                self.map.remove(victim.key.as_str());
                self.used -= victim.size;
                self.metrics.core.record_eviction(victim.size);
                last_priority = Some(victim.metadata.priority);
                self.notify_evicted(&victim, EvictionCause::Capacity);
            }
        }
        if let Some(last) = last_priority {
            self.inflation = self.inflation.max(last);
            self.metrics.record_batch(victims.len() as u64, self.inflation);
        }

        let stamp = self.next_stamp();
        let initial = priority(self.inflation, self.config.acquisition_cost(), 1, size);
        notify(
            self.listener.as_ref(),
            ALGORITHM,
            CacheEvent::Admit { key: &key, size },
        );
        let entry =
            CacheEntry::with_metadata(key.clone(), value, stamp, GdsfMeta::new(1, initial));
        let id = self.heap.push(entry);
        self.map.insert(key, id);
        self.used += size;
        self.metrics.core.record_insertion(size);
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Bytes> {
        let id = *self.map.get(key)?;
        self.detach(id, EvictionCause::Removed)
            .map(|entry| entry.value)
    }

    fn detach(&mut self, id: SlotId, cause: EvictionCause) -> Option<GdsfEntry> {
        let entry = self.heap.remove(id)?;
        self.map.remove(entry.key.as_str());
        self.used -= entry.size;
        self.metrics.core.record_removal(entry.size);
        self.notify_evicted(&entry, cause);
        Some(entry)
    }

    fn notify_evicted(&self, entry: &GdsfEntry, cause: EvictionCause) {
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
        self.inflation = self.config.initial_inflation();
        self.metrics.core.record_clear();
        self.metrics.inflation = self.inflation;
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
        ensure_invariant!(
            self.used <= self.config.max_size(),
            "stored size {} exceeds budget {}",
            self.used,
            self.config.max_size()
        );
        ensure_invariant!(
            self.inflation >= self.config.initial_inflation(),
            "inflation {} fell below its initial value",
            self.inflation
        );
        Ok(())
    }

    pub(crate) fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    #[cfg(test)]
    fn priority_of(&self, key: &str) -> Option<f64> {
        let id = *self.map.get(key)?;
        self.heap.get(id).map(|entry| entry.metadata.priority)
    }
}

impl fmt::Debug for GdsfSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GdsfSegment")
            .field("config", &self.config)
            .field("len", &self.map.len())
            .field("used", &self.used)
            .field("inflation", &self.inflation)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// A size-bounded GDSF cache of byte blobs.
///
/// # Examples
///
/// ```
/// use blobcache::GdsfCache;
///
/// let cache = GdsfCache::new(100, 2);
/// cache.put("a", vec![0u8; 30]).unwrap();
/// cache.put("b", vec![0u8; 30]).unwrap();
/// cache.put("c", vec![0u8; 40]).unwrap();
/// cache.get("c");
///
/// // Two evictions ("a", then "b") make room for 60 bytes
/// cache.put("d", vec![0u8; 60]).unwrap();
/// assert!(!cache.has("a") && !cache.has("b"));
/// assert_eq!(cache.size(), 100);
/// assert_eq!(cache.inflation(), 1.0);
/// ```
pub struct GdsfCache {
    segment: RwLock<GdsfSegment>,
}

impl GdsfCache {
    /// Creates an empty cache holding at most `max_size` bytes, evicting at
    /// most `max_evictions` entries per put.
    pub fn new(max_size: u64, max_evictions: usize) -> Self {
        Self::init(
            GdsfCacheConfig::new(max_size).with_max_evictions(max_evictions),
            None,
        )
    }

    /// Creates an empty cache from a configuration, with an optional event
    /// listener.
    pub fn init(config: GdsfCacheConfig, listener: Option<SharedListener>) -> Self {
        GdsfCache {
            segment: RwLock::new(GdsfSegment::init(config, listener)),
        }
    }

    /// Stores `value` under `key`.
    ///
    /// Evicts the fewest lowest-priority entries needed to stay within
    /// `max_size`. Fails without changing anything when more than
    /// `max_evictions` entries would have to go.
    pub fn put(
        &self,
        key: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> Result<(), AdmissionError> {
        self.segment.write().put(key.into(), value.into())
    }

    /// Returns the value for `key`, incrementing its access count and
    /// recomputing its priority.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.segment.write().get(key)
    }

    /// Returns whether `key` is cached, without counting an access.
    pub fn has(&self, key: &str) -> bool {
        self.segment.read().has(key)
    }

    /// Total bytes currently stored. Never exceeds [`max_size`](Self::max_size).
    pub fn size(&self) -> u64 {
        self.segment.read().size()
    }

    /// Configured byte budget.
    pub fn max_size(&self) -> u64 {
        self.segment.read().config.max_size()
    }

    /// Upper bound on entries evicted by one put.
    pub fn max_evictions(&self) -> usize {
        self.segment.read().config.max_evictions()
    }

    /// Current inflation value `L`.
    pub fn inflation(&self) -> f64 {
        self.segment.read().inflation()
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

    /// Removes `key`, returning its value if it was cached. Does not age the
    /// cache.
    pub fn remove(&self, key: &str) -> Option<Bytes> {
        self.segment.write().remove(key)
    }

    /// Drops every entry and resets inflation to its initial value.
    pub fn clear(&self) {
        self.segment.write().clear();
    }

    /// Verifies lookup table, heap, size accounting and budget agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.read().check_invariants()
    }
}

impl Cache for GdsfCache {
    fn put(&self, key: String, value: Bytes) -> Result<(), AdmissionError> {
        self.segment.write().put(key, value)
    }

    fn get(&self, key: &str) -> Option<Bytes> {
        GdsfCache::get(self, key)
    }

    fn has(&self, key: &str) -> bool {
        GdsfCache::has(self, key)
    }

    fn size(&self) -> u64 {
        GdsfCache::size(self)
    }
}

impl CacheMetrics for GdsfCache {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.read().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        ALGORITHM
    }
}

impl fmt::Debug for GdsfCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GdsfCache")
            .field("segment", &*self.segment.read())
            .finish()
    }
}
