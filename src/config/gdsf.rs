//! Configuration for the Greedy Dual-Size Frequency (GDSF) cache.
//!
//! # Examples
//!
//! ```
//! use blobcache::config::{AcquisitionCost, GdsfCacheConfig};
//! use blobcache::GdsfCache;
//!
//! // Byte budget only; everything else defaulted
//! let cache = GdsfCache::init(GdsfCacheConfig::new(1024), None);
//! assert_eq!(cache.max_evictions(), 10);
//!
//! // Fixed miss penalty, which makes priority favour small values
//! let config = GdsfCacheConfig::new(1024)
//!     .with_max_evictions(3)
//!     .with_acquisition_cost(AcquisitionCost::Constant(1.0));
//! let cache = GdsfCache::init(config, None);
//! assert_eq!(cache.max_evictions(), 3);
//! ```

use core::fmt;

/// Default bound on how many entries a single put may evict.
pub const DEFAULT_MAX_EVICTIONS: usize = 10;

/// How expensive it is to re-fetch a value after a miss.
///
/// GDSF priority is `L + frequency * cost / size`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AcquisitionCost {
    /// Cost equals the value's size (an empty value counts as one byte).
    /// Priority reduces to `L + frequency`, ignoring size.
    #[default]
    Size,
    /// Every value costs the same. Small values get higher priority.
    Constant(f64),
}

impl AcquisitionCost {
    /// Cost of acquiring a value of `size` bytes
    pub fn cost(self, size: u64) -> f64 {
        match self {
            AcquisitionCost::Size => size.max(1) as f64,
            AcquisitionCost::Constant(c) => c,
        }
    }
}

/// Configuration for a GDSF (Greedy Dual-Size Frequency) cache.
///
/// # Required Parameters
///
/// - `max_size`: byte budget, set in the constructor
///
/// # Optional Parameters (Builder Methods)
///
/// - `max_evictions`: upper bound on entries evicted by one put (default: 10)
/// - `initial_inflation`: starting value of `L` (default: 0.0)
/// - `acquisition_cost`: cost model (default: [`AcquisitionCost::Size`])
///
/// # Examples
///
/// ```
/// use blobcache::config::GdsfCacheConfig;
///
/// let config = GdsfCacheConfig::new(100).with_initial_inflation(2.5);
/// assert_eq!(config.max_size(), 100);
/// assert_eq!(config.max_evictions(), 10);
/// assert_eq!(config.initial_inflation(), 2.5);
/// ```
#[derive(Clone, Copy)]
pub struct GdsfCacheConfig {
    max_size: u64,
    max_evictions: usize,
    initial_inflation: f64,
    acquisition_cost: AcquisitionCost,
}

impl GdsfCacheConfig {
    /// Creates a configuration with the given byte budget and defaults for
    /// everything else.
    #[must_use]
    pub fn new(max_size: u64) -> Self {
        Self {
            max_size,
            max_evictions: DEFAULT_MAX_EVICTIONS,
            initial_inflation: 0.0,
            acquisition_cost: AcquisitionCost::default(),
        }
    }

    /// Sets the upper bound on entries one put may evict.
    ///
    /// With `0`, a put that does not fit in the free space is refused.
    #[must_use]
    pub fn with_max_evictions(mut self, max_evictions: usize) -> Self {
        self.max_evictions = max_evictions;
        self
    }

    /// Sets the starting inflation value `L`. `clear` resets to this value.
    #[must_use]
    pub fn with_initial_inflation(mut self, initial_inflation: f64) -> Self {
        self.initial_inflation = initial_inflation;
        self
    }

    /// Sets the acquisition cost model.
    #[must_use]
    pub fn with_acquisition_cost(mut self, acquisition_cost: AcquisitionCost) -> Self {
        self.acquisition_cost = acquisition_cost;
        self
    }

    /// Returns the byte budget.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Returns the per-put eviction bound.
    pub fn max_evictions(&self) -> usize {
        self.max_evictions
    }

    /// Returns the starting inflation value.
    pub fn initial_inflation(&self) -> f64 {
        self.initial_inflation
    }

    /// Returns the acquisition cost model.
    pub fn acquisition_cost(&self) -> AcquisitionCost {
        self.acquisition_cost
    }
}

impl fmt::Debug for GdsfCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GdsfCacheConfig")
            .field("max_size", &self.max_size)
            .field("max_evictions", &self.max_evictions)
            .field("initial_inflation", &self.initial_inflation)
            .field("acquisition_cost", &self.acquisition_cost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gdsf_config_defaults() {
        let config = GdsfCacheConfig::new(100);
        assert_eq!(config.max_size(), 100);
        assert_eq!(config.max_evictions(), DEFAULT_MAX_EVICTIONS);
        assert_eq!(config.initial_inflation(), 0.0);
        assert_eq!(config.acquisition_cost(), AcquisitionCost::Size);
    }

    #[test]
    fn test_gdsf_config_builder() {
        let config = GdsfCacheConfig::new(100)
            .with_max_evictions(0)
            .with_initial_inflation(1.5)
            .with_acquisition_cost(AcquisitionCost::Constant(2.0));
        assert_eq!(config.max_evictions(), 0);
        assert_eq!(config.initial_inflation(), 1.5);
        assert_eq!(config.acquisition_cost(), AcquisitionCost::Constant(2.0));
    }

    #[test]
    fn test_acquisition_cost() {
        assert_eq!(AcquisitionCost::Size.cost(40), 40.0);
        assert_eq!(AcquisitionCost::Size.cost(0), 1.0);
        assert_eq!(AcquisitionCost::Constant(3.0).cost(40), 3.0);
    }
}
