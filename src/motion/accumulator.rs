//! # Fractional Accumulator
//!
//! Banks sub-pixel motion per axis so that long runs of small deltas still
//! add up to whole pixels.
//!
//! Each sample's delta is added to the axis carry. While the running total
//! stays below one pixel nothing is emitted and the total is banked. Once it
//! reaches a whole pixel the total is rounded to the nearest integer and
//! emitted; what happens to the leftover fraction depends on [`FlushMode`].
//!
//! ```
//! use analog_mouse_bridge::motion::accumulator::{integrate, FlushMode};
//!
//! let (emit, carry) = integrate(0.5, 0.0, FlushMode::CarryRemainder);
//! assert_eq!(emit, None);
//! let (emit, carry) = integrate(0.75, carry, FlushMode::CarryRemainder);
//! assert_eq!(emit, Some(1));
//! assert!((carry - 0.25).abs() < 1e-12);
//! ```

use serde::Deserialize;

/// What to do with the fractional remainder after a whole-pixel emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushMode {
    /// Keep `total - emitted` as the new carry (|carry| <= 0.5).
    #[default]
    CarryRemainder,
    /// Drop the remainder; carry restarts at zero.
    Reset,
}

/// Adds `new_delta` to `carry` and decides whether a whole pixel is due.
///
/// Returns the pixels to emit (if any) and the carry to keep. The returned
/// carry always satisfies `|carry| < 1.0`.
#[must_use]
pub fn integrate(new_delta: f64, carry: f64, mode: FlushMode) -> (Option<i32>, f64) {
    let total = new_delta + carry;

    if !total.is_finite() {
        return (None, carry);
    }

    if total.abs() < 1.0 {
        return (None, total);
    }

    // `as` saturates at i32 bounds
    let emitted = total.round() as i32;
    let new_carry = match mode {
        FlushMode::CarryRemainder => (total - f64::from(emitted)).clamp(-0.5, 0.5),
        FlushMode::Reset => 0.0,
    };

    (Some(emitted), new_carry)
}

/// Carry state for one axis.
///
/// Owned by the sample loop; never shared between axes.
#[derive(Debug, Clone, Default)]
pub struct AxisAccumulator {
    carry: f64,
    mode: FlushMode,
    /// Consecutive dead-zoned samples before the carry is dropped (0 = never).
    idle_reset_samples: u32,
    idle_samples: u32,
}

impl AxisAccumulator {
    #[must_use]
    pub fn new(mode: FlushMode, idle_reset_samples: u32) -> Self {
        Self {
            carry: 0.0,
            mode,
            idle_reset_samples,
            idle_samples: 0,
        }
    }

    /// Banked sub-pixel motion.
    #[must_use]
    pub fn carry(&self) -> f64 {
        self.carry
    }

    /// Integrates a non-zero delta computed for this sample.
    pub fn integrate(&mut self, new_delta: f64) -> Option<i32> {
        self.idle_samples = 0;
        let (emit, carry) = integrate(new_delta, self.carry, self.mode);
        self.carry = carry;
        emit
    }

    /// Records a sample in which this axis was dead-zoned.
    ///
    /// The carry is left untouched unless the idle reset threshold is reached.
    pub fn mark_idle(&mut self) {
        if self.idle_reset_samples == 0 {
            return;
        }

        self.idle_samples = self.idle_samples.saturating_add(1);
        if self.idle_samples >= self.idle_reset_samples && self.carry != 0.0 {
            tracing::debug!(
                "Dropping carry {:.3} after {} idle samples",
                self.carry,
                self.idle_samples
            );
            self.carry = 0.0;
        }
    }
}
