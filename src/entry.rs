//! Unified Cache Entry Type
//!
//! Every engine stores its blobs as a [`CacheEntry<M>`]: the key, the immutable
//! value, its size in bytes, access timestamps, and algorithm-specific
//! metadata `M` (see [`crate::meta`]).
//!
//! # Timestamps
//!
//! Entries carry two notions of "last used":
//!
//! - a logical **stamp**, a per-cache counter bumped on every admission and
//!   hit. Stamps are unique within a cache, so they give LFU and GDSF a strict
//!   recency tie-break even when two accesses land in the same clock tick.
//! - a wall-clock [`Instant`], used only to report how long an entry sat idle
//!   when it is evicted.
//!
//! `size` is fixed at creation. Re-putting a key creates a fresh entry rather
//! than resizing the old one.

use bytes::Bytes;
use core::fmt;
use std::time::{Duration, Instant};

/// Cache entry holding key, value, timestamps, and algorithm-specific metadata.
///
/// # Examples
///
/// ```
/// use blobcache::entry::CacheEntry;
/// use bytes::Bytes;
///
/// let entry: CacheEntry = CacheEntry::new("key".to_string(), Bytes::from_static(b"blob"), 1);
/// assert_eq!(entry.key, "key");
/// assert_eq!(entry.size, 4);
/// assert_eq!(entry.stamp(), 1);
/// ```
pub struct CacheEntry<M = ()> {
    /// The cached key
    pub key: String,

    /// The cached blob. Never inspected or transformed.
    pub value: Bytes,

    /// Length of `value` in bytes.
    pub size: u64,

    /// Logical access stamp, unique within one cache instance.
    stamp: u64,

    /// Wall-clock time of the last admission or hit.
    last_used: Instant,

    /// Algorithm-specific metadata (frequency, priority, heap slot).
    pub metadata: M,
}

impl CacheEntry<()> {
    /// Creates an entry without algorithm-specific metadata.
    #[inline]
    pub fn new(key: String, value: Bytes, stamp: u64) -> Self {
        Self::with_metadata(key, value, stamp, ())
    }
}

impl<M> CacheEntry<M> {
    /// Creates an entry with algorithm-specific metadata.
    ///
    /// `size` is derived from the value's length.
    #[inline]
    pub fn with_metadata(key: String, value: Bytes, stamp: u64, metadata: M) -> Self {
        Self {
            size: value.len() as u64,
            key,
            value,
            stamp,
            last_used: Instant::now(),
            metadata,
        }
    }

    /// Records an access at logical time `stamp`.
    #[inline]
    pub fn touch(&mut self, stamp: u64) {
        self.stamp = stamp;
        self.last_used = Instant::now();
    }

    /// Logical stamp of the last admission or hit.
    #[inline]
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Wall-clock time of the last admission or hit.
    #[inline]
    pub fn last_used(&self) -> Instant {
        self.last_used
    }

    /// Time elapsed since the last admission or hit.
    #[inline]
    pub fn idle(&self) -> Duration {
        self.last_used.elapsed()
    }
}

impl<M: fmt::Debug> fmt::Debug for CacheEntry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("size", &self.size)
            .field("stamp", &self.stamp)
            .field("metadata", &self.metadata)
            .finish()
    }
}
