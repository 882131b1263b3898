//! Engine tuning knobs.

use crate::style::ByteWidth;

/// Default relative tolerance for `f32` array comparisons.
pub const DEFAULT_FLOAT_PRECISION: f32 = 0.000_01;
/// Default relative tolerance for `f64` array comparisons.
pub const DEFAULT_DOUBLE_PRECISION: f64 = 1e-12;

/// Settings shared by every evaluator of one [`crate::TestContext`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Multiplied by each expected `f32` element to get its tolerance.
    pub float_precision: f32,
    /// Multiplied by each expected `f64` element to get its tolerance.
    pub double_precision: f64,
    /// Word width used when rendering bit masks.
    pub mask_width: ByteWidth,
    /// Print expected/actual floats instead of the bare delta notice.
    pub float_verbose: bool,
}

impl EngineConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            float_precision: DEFAULT_FLOAT_PRECISION,
            double_precision: DEFAULT_DOUBLE_PRECISION,
            mask_width: ByteWidth::Four,
            float_verbose: false,
        }
    }

    #[must_use]
    pub const fn with_float_precision(mut self, precision: f32) -> Self {
        self.float_precision = precision;
        self
    }

    #[must_use]
    pub const fn with_double_precision(mut self, precision: f64) -> Self {
        self.double_precision = precision;
        self
    }

    #[must_use]
    pub const fn with_mask_width(mut self, width: ByteWidth) -> Self {
        self.mask_width = width;
        self
    }

    #[must_use]
    pub const fn with_float_verbose(mut self, verbose: bool) -> Self {
        self.float_verbose = verbose;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
