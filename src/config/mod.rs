//! Cache Configuration Module
//!
//! Configuration structures for the three cache policies. Each cache type has
//! its own dedicated configuration struct.
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | [`LruCacheConfig`] | [`LruCache`](crate::LruCache) | Least Recently Used |
//! | [`LfuCacheConfig`] | [`LfuCache`](crate::LfuCache) | Least Frequently Used |
//! | [`GdsfCacheConfig`] | [`GdsfCache`](crate::GdsfCache) | Greedy Dual-Size Frequency |
//!
//! LRU and LFU take a single parameter and use plain public fields. GDSF has
//! several optional knobs and uses a builder.
//!
//! # Sizing
//!
//! `max_size` is a budget for value bytes only. Keys, map slots and ordering
//! metadata add roughly 80-120 bytes per entry on top of it.
//!
//! ```text
//! Total Memory ≈ max_size + (entries × overhead_per_entry)
//! ```
//!
//! # Examples
//!
//! ```
//! use blobcache::config::{GdsfCacheConfig, LruCacheConfig};
//! use blobcache::{GdsfCache, LruCache};
//!
//! let lru = LruCache::init(LruCacheConfig { max_size: 50 * 1024 * 1024 }, None);
//! assert_eq!(lru.max_size(), 50 * 1024 * 1024);
//!
//! let config = GdsfCacheConfig::new(10 * 1024 * 1024).with_max_evictions(4);
//! let gdsf = GdsfCache::init(config, None);
//! assert_eq!(gdsf.max_evictions(), 4);
//! ```

pub mod gdsf;
pub mod lfu;
pub mod lru;

pub use gdsf::{AcquisitionCost, GdsfCacheConfig};
pub use lfu::LfuCacheConfig;
pub use lru::LruCacheConfig;
