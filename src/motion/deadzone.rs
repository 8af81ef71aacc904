//! # Dead-Zone Gate
//!
//! Suppresses motion for normalized values close to center so that a
//! resting stick does not make the pointer drift.

/// Returns `true` when `value` is far enough from zero to produce motion.
///
/// The comparison is strict: a value sitting exactly on the threshold is
/// gated. Zero never passes, even with a zero deadzone, so callers can
/// derive a sign from any value that passes.
///
/// # Examples
///
/// ```
/// use analog_mouse_bridge::motion::deadzone::passes;
///
/// assert!(!passes(0.1, 0.1));
/// assert!(passes(0.1001, 0.1));
/// assert!(!passes(0.0, 0.0));
/// ```
#[inline]
#[must_use]
pub fn passes(value: f64, deadzone: f64) -> bool {
    value != 0.0 && value.abs() > deadzone
}
