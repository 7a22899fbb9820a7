//! Event hooks fired at admission, eviction, hit, miss and rejection.
//!
//! Caches report what they do through an injectable [`EventListener`] rather
//! than printing. Pass one to `init` to observe a cache; without a listener no
//! events are built.
//!
//! Two listeners ship with the crate:
//!
//! - [`LogListener`] forwards every event to the [`log`] facade.
//! - [`FnListener`] wraps a closure.
//!
//! # Example
//! ```
//! use blobcache::config::LruCacheConfig;
//! use blobcache::listener::{CacheEvent, EvictionCause, FnListener};
//! use blobcache::LruCache;
//! use std::sync::{Arc, Mutex};
//!
//! let evicted: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&evicted);
//!
//! let listener = FnListener(move |event: &CacheEvent<'_>| {
//!     if let CacheEvent::Evict { key, cause: EvictionCause::Capacity, .. } = event {
//!         sink.lock().unwrap().push(key.to_string());
//!     }
//! });
//!
//! let cache = LruCache::init(LruCacheConfig { max_size: 100 }, Some(Arc::new(listener)));
//! cache.put("key1", vec![0u8; 50]);
//! cache.put("key2", vec![0u8; 40]);
//! cache.put("key3", vec![0u8; 30]);
//!
//! assert_eq!(*evicted.lock().unwrap(), vec!["key1".to_string()]);
//! ```

use core::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Keys longer than this are truncated by [`LogListener`].
pub const LOG_KEY_LIMIT: usize = 10;

/// The reason an entry left the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvictionCause {
    /// Chosen as a victim to make room for an admission.
    Capacity,
    /// Superseded by a new `put` under the same key.
    Replaced,
    /// Removed explicitly via `remove`.
    Removed,
}

/// Something a cache did, reported to an [`EventListener`].
#[derive(Clone, Debug, PartialEq)]
pub enum CacheEvent<'a> {
    /// A value was stored.
    Admit {
        /// Key the value was stored under.
        key: &'a str,
        /// Size of the value in bytes.
        size: u64,
    },
    /// An entry left the cache.
    Evict {
        /// Key of the evicted entry.
        key: &'a str,
        /// Size of the evicted value in bytes.
        size: u64,
        /// Access count, for policies that track one.
        frequency: Option<u64>,
        /// Time since the entry was last admitted or hit.
        idle: Duration,
        /// Why the entry left.
        cause: EvictionCause,
    },
    /// A `get` found its key.
    Hit {
        /// Key that was found.
        key: &'a str,
        /// Access count after this hit, for policies that track one.
        frequency: Option<u64>,
        /// Priority after this hit, for GDSF.
        priority: Option<f64>,
    },
    /// A `get` did not find its key.
    Miss {
        /// Key that was looked up.
        key: &'a str,
    },
    /// A GDSF `put` was refused because not enough room could be freed.
    Reject {
        /// Key of the refused value.
        key: &'a str,
        /// Size of the refused value in bytes.
        size: u64,
        /// Eviction budget the cache was configured with.
        max_evictions: usize,
    },
}

/// Forwards `event` to `listener`, if one is installed.
#[inline]
pub(crate) fn notify(
    listener: Option<&SharedListener>,
    algorithm: &'static str,
    event: CacheEvent<'_>,
) {
    if let Some(listener) = listener {
        listener.on_event(algorithm, &event);
    }
}

/// A callback invoked for every [`CacheEvent`].
///
/// Listeners run while the cache holds its lock. **Do not call back into the
/// same cache from inside a listener**; it will deadlock.
pub trait EventListener: Send + Sync {
    /// Called once per event. `algorithm` names the reporting policy.
    fn on_event(&self, algorithm: &'static str, event: &CacheEvent<'_>);
}

/// Shared handle to a listener, as accepted by every cache's `init`.
pub type SharedListener = Arc<dyn EventListener>;

/// An [`EventListener`] backed by a closure.
pub struct FnListener<F>(pub F);

impl<F> EventListener for FnListener<F>
where
    F: Fn(&CacheEvent<'_>) + Send + Sync,
{
    fn on_event(&self, _algorithm: &'static str, event: &CacheEvent<'_>) {
        (self.0)(event)
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnListener")
    }
}

/// Forwards events to the `log` facade under the `blobcache` target.
///
/// Admissions and evictions log at `debug`, hits and misses at `trace`,
/// rejections at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogListener;

impl EventListener for LogListener {
    fn on_event(&self, algorithm: &'static str, event: &CacheEvent<'_>) {
        match *event {
            CacheEvent::Admit { key, size } => {
                log::debug!(target: "blobcache", "[{algorithm}] admitted key {:?}; size {size}", shorten(key, LOG_KEY_LIMIT));
            }
            CacheEvent::Evict {
                key,
                size,
                frequency,
                idle,
                cause,
            } => {
                log::debug!(
                    target: "blobcache",
                    "[{algorithm}] evicting key {:?}; size {size}; count: {frequency:?}; idle: {idle:?}; cause: {cause:?}",
                    shorten(key, LOG_KEY_LIMIT)
                );
            }
            CacheEvent::Hit {
                key,
                frequency,
                priority,
            } => {
                log::trace!(
                    target: "blobcache",
                    "[{algorithm}] get key {:?}; count {frequency:?}; h: {priority:?}",
                    shorten(key, LOG_KEY_LIMIT)
                );
            }
            CacheEvent::Miss { key } => {
                log::trace!(target: "blobcache", "[{algorithm}] miss key {:?}", shorten(key, LOG_KEY_LIMIT));
            }
            CacheEvent::Reject {
                key,
                size,
                max_evictions,
            } => {
                log::warn!(
                    target: "blobcache",
                    "[{algorithm}] rejected key {:?}; size {size}; max evictions {max_evictions}",
                    shorten(key, LOG_KEY_LIMIT)
                );
            }
        }
    }
}

/// Returns at most `limit` characters of `s`, cut on a char boundary.
pub fn shorten(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("key1", 10), "key1");
        assert_eq!(shorten("a-very-long-key", 6), "a-very");
        assert_eq!(shorten("", 3), "");
        assert_eq!(shorten("ключ-значение", 4), "ключ");
    }

    #[test]
    fn test_fn_listener_receives_events() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener = FnListener(move |event: &CacheEvent<'_>| {
            sink.lock().unwrap().push(format!("{event:?}"));
        });

        listener.on_event("LRU", &CacheEvent::Miss { key: "a" });
        listener.on_event("LRU", &CacheEvent::Admit { key: "a", size: 3 });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("Miss"));
        assert!(seen[1].contains("Admit"));
    }

    #[test]
    fn test_log_listener_handles_every_event() {
        let listener = LogListener;
        let events = [
            CacheEvent::Admit { key: "k", size: 1 },
            CacheEvent::Evict {
                key: "k",
                size: 1,
                frequency: Some(2),
                idle: Duration::from_millis(5),
                cause: EvictionCause::Capacity,
            },
            CacheEvent::Hit {
                key: "k",
                frequency: None,
                priority: None,
            },
            CacheEvent::Miss { key: "k" },
            CacheEvent::Reject {
                key: "k",
                size: 1,
                max_evictions: 1,
            },
        ];
        for event in &events {
            listener.on_event("GDSF", event);
        }
    }
}
