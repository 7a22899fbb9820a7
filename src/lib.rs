//! # blobcache
//!
//! A size-bounded, in-memory cache of byte blobs keyed by strings, with three
//! interchangeable eviction policies behind one contract.
//!
//! Every cache is bounded by the total number of **value bytes** it holds,
//! not by entry count, and is safe to share between threads as-is.
//!
//! ## Quick Reference
//!
//! | Algorithm | Description | Evicts per put | Can refuse a put |
//! |-----------|-------------|----------------|------------------|
//! | [`LruCache`] | Least Recently Used | at most 1 | no |
//! | [`LfuCache`] | Least Frequently Used | at most 1 | no |
//! | [`GdsfCache`] | Greedy Dual-Size Frequency | up to `max_evictions` | yes |
//!
//! LRU and LFU always admit, evicting one entry when the budget would be
//! exceeded, and may therefore sit over budget for a while. GDSF evicts as
//! many entries as needed (within its bound) and refuses values it cannot
//! fit, so it never exceeds its budget.
//!
//! ## Performance Characteristics
//!
//! | Algorithm | Get | Put | Has | Memory/Entry |
//! |-----------|-----|-----|-----|--------------|
//! | LRU       | O(1)| O(1)| O(1)| ~80 bytes    |
//! | LFU       | O(log n)| O(log n)| O(1)| ~96 bytes |
//! | GDSF      | O(log n)| O(k² + k log n)| O(1)| ~104 bytes |
//!
//! ## Code Examples
//!
//! ### LRU (Least Recently Used)
//!
//! ```rust
//! use blobcache::LruCache;
//!
//! let cache = LruCache::new(100);
//! cache.put("a", vec![0u8; 40]);
//! cache.put("b", vec![0u8; 40]);
//! cache.get("a");                 // "a" becomes most recently used
//! cache.put("c", vec![0u8; 40]);  // "b" evicted
//! assert!(!cache.has("b"));
//! ```
//!
//! ### LFU (Least Frequently Used)
//!
//! ```rust
//! use blobcache::LfuCache;
//!
//! let cache = LfuCache::new(100);
//! cache.put("rare", vec![0u8; 40]);
//! cache.put("popular", vec![0u8; 40]);
//! for _ in 0..10 {
//!     cache.get("popular");
//! }
//! cache.put("new", vec![0u8; 40]);  // "rare" evicted (lowest count)
//! assert!(cache.has("popular"));
//! ```
//!
//! ### GDSF (Greedy Dual-Size Frequency)
//!
//! ```rust
//! use blobcache::GdsfCache;
//!
//! let cache = GdsfCache::new(100, 10);
//! cache.put("a", vec![0u8; 30])?;
//! cache.put("b", vec![0u8; 30])?;
//! cache.put("c", vec![0u8; 90])?;  // evicts "a" and "b"
//! assert_eq!(cache.size(), 90);
//!
//! assert!(cache.put("huge", vec![0u8; 200]).is_err());
//! # Ok::<(), blobcache::AdmissionError>(())
//! ```
//!
//! ### Policy-agnostic code
//!
//! ```rust
//! use blobcache::{Cache, GdsfCache, LruCache};
//! use bytes::Bytes;
//!
//! fn warm(cache: &dyn Cache) {
//!     let _ = cache.put("index".to_string(), Bytes::from_static(b"<html>"));
//! }
//!
//! let lru = LruCache::new(1024);
//! let gdsf = GdsfCache::new(1024, 4);
//! warm(&lru);
//! warm(&gdsf);
//! assert!(lru.has("index") && gdsf.has("index"));
//! ```
//!
//! ## Observability
//!
//! Caches accept an optional [`EventListener`](listener::EventListener) at
//! construction, and report counters through
//! [`CacheMetrics`](metrics::CacheMetrics). See the [`listener`] and
//! [`metrics`] modules.
//!
//! ## Feature Flags
//!
//! - `hashbrown` (default): use `hashbrown` for the lookup tables
//! - `nightly`: enable `hashbrown`'s nightly optimizations

/// Slot arena giving entries stable handles.
pub(crate) mod arena;

/// Arena-backed doubly linked list used by LRU.
pub(crate) mod list;

/// Binary min-heap with tracked positions used by LFU and GDSF.
pub(crate) mod heap;

/// Cache configuration structures.
pub mod config;

/// Unified cache entry type.
pub mod entry;

/// Error types.
pub mod error;

/// Event listener hooks.
pub mod listener;

/// Algorithm-specific metadata types.
pub mod meta;

/// Cache metrics system.
pub mod metrics;

/// The policy-agnostic cache contract.
pub mod traits;

/// Least Recently Used cache.
pub mod lru;

/// Least Frequently Used cache.
pub mod lfu;

/// Greedy Dual-Size Frequency cache.
pub mod gdsf;

pub use entry::CacheEntry;
pub use error::{AdmissionError, InvariantError};
pub use gdsf::GdsfCache;
pub use lfu::LfuCache;
pub use listener::{CacheEvent, EventListener, EvictionCause, SharedListener};
pub use lru::LruCache;
pub use meta::{GdsfMeta, LfuMeta};
pub use traits::Cache;
