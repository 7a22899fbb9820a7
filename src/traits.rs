//! The capability set shared by every eviction policy.
//!
//! Callers that should not care which policy backs a cache program against
//! [`Cache`], typically as `Arc<dyn Cache>`.
//!
//! ```
//! use blobcache::{Cache, GdsfCache, LfuCache, LruCache};
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! let caches: Vec<Arc<dyn Cache>> = vec![
//!     Arc::new(LruCache::new(100)),
//!     Arc::new(LfuCache::new(100)),
//!     Arc::new(GdsfCache::new(100, 10)),
//! ];
//!
//! for cache in &caches {
//!     cache.put("key".to_string(), Bytes::from_static(b"blob")).unwrap();
//!     assert!(cache.has("key"));
//!     assert_eq!(cache.get("key"), Some(Bytes::from_static(b"blob")));
//!     assert_eq!(cache.size(), 4);
//! }
//! ```

use crate::error::AdmissionError;
use bytes::Bytes;

/// A size-bounded, thread-safe map from string keys to byte blobs.
///
/// Values are opaque: they are never inspected or transformed.
pub trait Cache: Send + Sync {
    /// Stores `value` under `key`, evicting entries as the policy dictates.
    ///
    /// Putting an existing key replaces its entry with a fresh one. Only GDSF
    /// can refuse an admission; LRU and LFU always return `Ok`.
    fn put(&self, key: String, value: Bytes) -> Result<(), AdmissionError>;

    /// Returns the value for `key`. A hit counts as an access; a miss changes
    /// nothing.
    fn get(&self, key: &str) -> Option<Bytes>;

    /// Returns whether `key` is cached. Never counts as an access.
    fn has(&self, key: &str) -> bool;

    /// Total bytes currently stored.
    fn size(&self) -> u64;
}
