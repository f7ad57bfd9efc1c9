//! Load-factor thresholds that drive bucket array growth and shrinkage.

use crate::error::{Error, Result};

/// Factor applied to the bucket count on every grow/shrink step.
pub const GROWTH_FACTOR: usize = 2;

/// Grow/shrink thresholds for a `ChainHashMap`.
///
/// After every insert or erase the map checks `len / bucket_count`:
/// above `max_load` the bucket count doubles, below `min_load` it halves
/// (never below one bucket). `new` rejects thresholds closer than a factor
/// of two, so one resize can never land past the opposite threshold.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResizePolicy {
    min_load: f64,
    max_load: f64,
}

impl ResizePolicy {
    pub const DEFAULT_MIN_LOAD: f64 = 0.25;
    pub const DEFAULT_MAX_LOAD: f64 = 0.75;

    pub fn new(min_load: f64, max_load: f64) -> Result<Self> {
        let valid = min_load >= 0.0
            && max_load.is_finite()
            && max_load > 0.0
            && min_load * GROWTH_FACTOR as f64 <= max_load;
        if !valid {
            return Err(Error::InvalidLoadFactors {
                min: min_load,
                max: max_load,
            });
        }
        Ok(Self { min_load, max_load })
    }

    pub fn min_load_factor(&self) -> f64 {
        self.min_load
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load
    }

    /// Bucket count that brings `len` back within thresholds, starting
    /// from `buckets`. Returns `buckets` when no resize is needed.
    pub(crate) fn target_buckets(&self, len: usize, buckets: usize) -> usize {
        let mut target = buckets.max(1);
        while load(len, target) > self.max_load {
            match target.checked_mul(GROWTH_FACTOR) {
                Some(t) => target = t,
                None => break,
            }
        }
        while target > 1 && load(len, target) < self.min_load {
            target /= GROWTH_FACTOR;
        }
        target
    }
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            min_load: Self::DEFAULT_MIN_LOAD,
            max_load: Self::DEFAULT_MAX_LOAD,
        }
    }
}

#[inline]
pub(crate) fn load(len: usize, buckets: usize) -> f64 {
    len as f64 / buckets as f64
}
