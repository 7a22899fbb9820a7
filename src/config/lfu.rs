//! Configuration for the Least Frequently Used (LFU) cache.

use core::fmt;

/// Configuration for an LFU (Least Frequently Used) cache.
///
/// LFU evicts the entry with the lowest access count, breaking ties by the
/// oldest last access. Like LRU it evicts at most one entry per put.
///
/// # Examples
///
/// ```
/// use blobcache::config::LfuCacheConfig;
/// use blobcache::LfuCache;
///
/// let config = LfuCacheConfig { max_size: 4096 };
/// let cache = LfuCache::init(config, None);
/// assert_eq!(cache.max_size(), 4096);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LfuCacheConfig {
    /// Maximum total size in bytes for cached values.
    pub max_size: u64,
}

impl fmt::Debug for LfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCacheConfig")
            .field("max_size", &self.max_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfu_config_creation() {
        let config = LfuCacheConfig { max_size: 1024 };
        assert_eq!(config.max_size, 1024);
        assert_eq!(config, LfuCacheConfig { max_size: 1024 });
    }
}
