//! # Velocity Scaler
//!
//! Converts a shaped unit value into pixels for one sample tick.
//!
//! The sample interval comes from the configured transmission delay of the
//! analog source and is treated as constant for the whole run; actual
//! arrival jitter is not measured.

use std::time::Duration;

/// Scales a shaped value in `[-1, 1]` to a pixel delta for one sample.
///
/// `shaped_unit * max_speed_px_per_s * sample_interval_s`
///
/// # Examples
///
/// ```
/// use analog_mouse_bridge::motion::velocity::scale;
///
/// // Full deflection at 4000 px/s sampled every 10 ms moves 40 px per sample
/// assert!((scale(1.0, 4000.0, 0.01) - 40.0).abs() < 1e-9);
/// ```
#[inline]
#[must_use]
pub fn scale(shaped_unit: f64, max_speed_px_per_s: f64, sample_interval_s: f64) -> f64 {
    shaped_unit * max_speed_px_per_s * sample_interval_s
}

/// Max speed and sample interval fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityScaler {
    max_speed_px_per_s: f64,
    sample_interval_s: f64,
}

impl Default for VelocityScaler {
    fn default() -> Self {
        Self::new(4000.0, Duration::from_millis(10))
    }
}

impl VelocityScaler {
    /// Creates a scaler from a max speed (pixels/second) and the per-sample delay.
    #[must_use]
    pub fn new(max_speed_px_per_s: f64, sample_interval: Duration) -> Self {
        Self {
            max_speed_px_per_s,
            sample_interval_s: sample_interval.as_secs_f64(),
        }
    }

    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.max_speed_px_per_s
    }

    #[must_use]
    pub fn sample_interval_s(&self) -> f64 {
        self.sample_interval_s
    }

    /// Pixels moved in one sample at full deflection.
    #[must_use]
    pub fn pixels_per_sample(&self) -> f64 {
        scale(1.0, self.max_speed_px_per_s, self.sample_interval_s)
    }

    #[inline]
    #[must_use]
    pub fn scale(&self, shaped_unit: f64) -> f64 {
        scale(shaped_unit, self.max_speed_px_per_s, self.sample_interval_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_full_deflection() {
        assert!((scale(1.0, 4000.0, 0.01) - 40.0).abs() < 1e-9);
        assert!((scale(-1.0, 4000.0, 0.01) + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_zero() {
        assert_eq!(scale(0.0, 4000.0, 0.01), 0.0);
    }

    #[test]
    fn test_scaler_defaults() {
        let scaler = VelocityScaler::default();
        assert_eq!(scaler.max_speed(), 4000.0);
        assert!((scaler.sample_interval_s() - 0.01).abs() < 1e-12);
        assert!((scaler.pixels_per_sample() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaler_is_linear() {
        let scaler = VelocityScaler::new(1000.0, Duration::from_millis(20));
        assert!((scaler.scale(0.5) - 10.0).abs() < 1e-9);
        assert!((scaler.scale(-0.25) + 5.0).abs() < 1e-9);
    }
}
