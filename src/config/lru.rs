//! Configuration for the Least Recently Used (LRU) cache.

use core::fmt;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// LRU evicts the least recently accessed entry when an admission would push
/// the stored bytes over `max_size`. Exactly one entry is evicted per put, so
/// the cache can drift over budget when a large value replaces a small one.
///
/// # Examples
///
/// ```
/// use blobcache::config::LruCacheConfig;
/// use blobcache::LruCache;
///
/// // 10MB of values
/// let config = LruCacheConfig {
///     max_size: 10 * 1024 * 1024,
/// };
/// let cache = LruCache::init(config, None);
/// assert!(cache.is_empty());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum total size in bytes for cached values.
    pub max_size: u64,
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("max_size", &self.max_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_config_creation() {
        let config = LruCacheConfig {
            max_size: 10 * 1024 * 1024,
        };
        assert_eq!(config.max_size, 10 * 1024 * 1024);
        assert_eq!(
            format!("{:?}", config),
            "LruCacheConfig { max_size: 10485760 }"
        );
    }
}
