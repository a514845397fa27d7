use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Per-column linear rescale between a [min, max] domain and [0, 1]
// ---------------------------------------------------------------------------

/// Forward rescale: a value in `[min, max]` maps onto `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    min: f64,
    max: f64,
}

impl Normalizer {
    /// A degenerate domain (`min == max`) cannot be rescaled and is
    /// rejected here rather than dividing by zero later.
    pub fn new(min: f64, max: f64) -> DataResult<Self> {
        if min == max {
            return Err(DataError::Configuration(format!(
                "degenerate normalization domain: min == max ({min})"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn apply(&self, x: f64) -> DataResult<f64> {
        if x < self.min || x > self.max {
            return Err(DataError::OutOfRange {
                value: x,
                min: self.min,
                max: self.max,
            });
        }
        Ok((x - self.min) / (self.max - self.min))
    }
}

/// Inverse rescale: a value in `[0, 1]` maps back onto `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct Denormalizer {
    min: f64,
    max: f64,
}

impl Denormalizer {
    pub fn new(min: f64, max: f64) -> DataResult<Self> {
        if min == max {
            return Err(DataError::Configuration(format!(
                "degenerate normalization domain: min == max ({min})"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn apply(&self, y: f64) -> DataResult<f64> {
        if !(0.0..=1.0).contains(&y) {
            return Err(DataError::OutOfRange {
                value: y,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(self.min + y * (self.max - self.min))
    }
}
