//! Error types returned by the cache engines.
//!
//! Only two things can go wrong in this crate:
//!
//! - [`AdmissionError`]: a GDSF put could not free enough room for the
//!   incoming blob within its eviction budget. The store is left unchanged.
//! - [`InvariantError`]: `check_invariants()` found the lookup table and the
//!   ordering structure out of step. This indicates a bug in the crate and is
//!   intended for tests and debug assertions.
//!
//! Misses are never errors; `get` and `has` report absence through `Option`
//! and `bool`.

use thiserror::Error;

/// Returned when an incoming value cannot be admitted.
///
/// LRU and LFU never produce this error; they always admit and may drift
/// over budget instead.
///
/// # Examples
///
/// ```
/// use blobcache::{AdmissionError, GdsfCache};
///
/// let cache = GdsfCache::new(100, 1);
/// cache.put("a", vec![0u8; 50]).unwrap();
/// cache.put("b", vec![0u8; 40]).unwrap();
///
/// let err = cache.put("c", vec![0u8; 90]).unwrap_err();
/// assert!(matches!(err, AdmissionError::TooLarge { size: 90, .. }));
/// assert!(cache.has("a") && cache.has("b"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// No set of at most `max_evictions` entries frees enough space.
    #[error(
        "object is too big; can't free up enough memory with max evictions \
         (size: {size}; max evictions: {max_evictions}; reclaimable: {reclaimable}; \
         cache size: {max_size})"
    )]
    TooLarge {
        /// Size of the rejected value in bytes.
        size: u64,
        /// Eviction budget the cache was configured with.
        max_evictions: usize,
        /// Bytes the best admissible batch of victims would have freed.
        reclaimable: u64,
        /// Configured byte budget of the cache.
        max_size: u64,
    },
}

/// Returned by `check_invariants()` when internal bookkeeping is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Returns `Err(InvariantError)` with a formatted message unless `cond` holds.
macro_rules! ensure_invariant {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::InvariantError::new(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure_invariant;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_error_display() {
        let err = AdmissionError::TooLarge {
            size: 90,
            max_evictions: 1,
            reclaimable: 50,
            max_size: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("object is too big"));
        assert!(msg.contains("size: 90"));
        assert!(msg.contains("max evictions: 1"));
    }

    #[test]
    fn test_invariant_error_message() {
        let err = InvariantError::new("heap index mismatch");
        assert_eq!(err.message(), "heap index mismatch");
        assert_eq!(err.to_string(), "heap index mismatch");
    }

    fn check(value: usize) -> Result<(), InvariantError> {
        ensure_invariant!(value < 3, "value {} out of range", value);
        Ok(())
    }

    #[test]
    fn test_ensure_invariant_macro() {
        assert!(check(1).is_ok());
        assert_eq!(check(5).unwrap_err().message(), "value 5 out of range");
    }
}
