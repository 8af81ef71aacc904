//! # Motion Module
//!
//! Signal-to-motion transform for one analog axis.
//!
//! This module handles:
//! - Mapping raw readings onto the normalized range
//! - Gating readings inside the dead zone
//! - Shaping the magnitude with the response curve
//! - Scaling to pixels per sample
//! - Banking sub-pixel remainders per axis
//!
//! ## Pipeline
//!
//! ```text
//! raw ──► range::map ──► deadzone::passes ──► curve::shape(|v|) * sign ──► velocity::scale ──► px
//! ```
//!
//! ## Usage
//!
//! ```
//! use analog_mouse_bridge::motion::AxisTransform;
//!
//! let transform = AxisTransform::default();
//!
//! // Centered stick: dead-zoned, no motion
//! assert_eq!(transform.delta(340), None);
//!
//! // Full deflection towards src_min: -40 px at 4000 px/s, 10 ms per sample
//! let px = transform.delta(1).unwrap();
//! assert!((px + 40.0).abs() < 1e-9);
//! ```

pub mod accumulator;
pub mod curve;
pub mod deadzone;
pub mod range;
pub mod velocity;

use std::time::Duration;

use crate::config::Config;
use crate::error::Result;

use self::curve::CurveSpec;
use self::range::RangeMap;
use self::velocity::VelocityScaler;

/// Default dead-zone threshold on the normalized scale.
pub const DEFAULT_DEADZONE: f64 = 0.1;

/// Sign of `value`, with zero mapping to zero.
#[inline]
#[must_use]
pub fn signum(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Stateless per-axis transform from raw reading to pixel delta.
///
/// Both axes share one transform; carry state lives in
/// [`accumulator::AxisAccumulator`].
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTransform {
    range: RangeMap,
    deadzone: f64,
    curve: CurveSpec,
    velocity: VelocityScaler,
}

impl Default for AxisTransform {
    fn default() -> Self {
        Self {
            range: RangeMap::default(),
            deadzone: DEFAULT_DEADZONE,
            curve: CurveSpec::default(),
            velocity: VelocityScaler::default(),
        }
    }
}

impl AxisTransform {
    #[must_use]
    pub fn new(range: RangeMap, deadzone: f64, curve: CurveSpec, velocity: VelocityScaler) -> Self {
        Self {
            range,
            deadzone,
            curve,
            velocity,
        }
    }

    /// Builds the transform from validated configuration.
    ///
    /// The curve text is parsed here, once, so per-sample evaluation never
    /// sees a parse error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BridgeError::CurveParse`] if `motion.curve` is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let input = &config.input;
        let motion = &config.motion;

        Ok(Self {
            range: RangeMap::new(input.src_min, input.src_max, input.dst_min, input.dst_max),
            deadzone: input.deadzone,
            curve: motion.curve.parse()?,
            velocity: VelocityScaler::new(
                motion.speed_max,
                Duration::from_millis(motion.sample_delay_ms),
            ),
        })
    }

    #[must_use]
    pub fn curve(&self) -> &CurveSpec {
        &self.curve
    }

    #[must_use]
    pub fn velocity(&self) -> &VelocityScaler {
        &self.velocity
    }

    /// Maps a raw reading onto the normalized range.
    #[must_use]
    pub fn normalize(&self, raw: i32) -> f64 {
        self.range.map(raw)
    }

    /// Pixel delta for one raw reading, or `None` if the reading produces
    /// no motion this sample.
    #[must_use]
    pub fn delta(&self, raw: i32) -> Option<f64> {
        let value = self.normalize(raw);

        // Gate before taking the sign: the sign of a gated value is never needed.
        if !deadzone::passes(value, self.deadzone) {
            return None;
        }

        let shaped = signum(value) * self.curve.shape(value.abs());
        let px = self.velocity.scale(shaped);

        (px != 0.0 && px.is_finite()).then_some(px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signum_defined_at_zero() {
        assert_eq!(signum(0.0), 0.0);
        assert_eq!(signum(-0.0), 0.0);
        assert_eq!(signum(0.3), 1.0);
        assert_eq!(signum(-0.3), -1.0);
    }

    #[test]
    fn test_centered_reading_is_gated() {
        let transform = AxisTransform::default();
        assert_eq!(transform.delta(340), None);
        assert_eq!(transform.delta(341), None);
    }

    #[test]
    fn test_src_min_full_speed_negative() {
        let transform = AxisTransform::default();
        let px = transform.delta(1).unwrap();
        assert!((px + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_src_max_slightly_below_full_speed() {
        let transform = AxisTransform::default();
        let value: f64 = 679.0 / 680.0 * 2.0 - 1.0;
        let expected = (0.9 * value.powi(5) + 0.1 * value) * 40.0;
        let px = transform.delta(680).unwrap();
        assert!((px - expected).abs() < 1e-9);
        assert!(px > 39.0 && px < 40.0);
    }

    #[test]
    fn test_odd_symmetry() {
        let transform = AxisTransform::new(
            RangeMap::new(-100, 100, -1.0, 1.0),
            0.0,
            CurveSpec::default(),
            VelocityScaler::default(),
        );
        // (raw + 100) / 100 * 2 - 1 is zero at raw = -50
        let zero_raw = -50;
        assert_eq!(transform.normalize(zero_raw), 0.0);
        let up = transform.delta(zero_raw + 10).unwrap();
        let down = transform.delta(zero_raw - 10).unwrap();
        assert!((up + down).abs() < 1e-9);
    }

    #[test]
    fn test_zero_deadzone_at_exact_zero() {
        let transform = AxisTransform::new(
            RangeMap::new(-100, 100, -1.0, 1.0),
            0.0,
            CurveSpec::default(),
            VelocityScaler::default(),
        );
        assert_eq!(transform.normalize(-50), 0.0);
        assert_eq!(transform.delta(-50), None);
    }

    #[test]
    fn test_from_config_defaults() {
        let transform = AxisTransform::from_config(&Config::default()).unwrap();
        assert_eq!(transform, AxisTransform::default());
    }

    #[test]
    fn test_from_config_rejects_bad_curve() {
        let mut config = Config::default();
        config.motion.curve = "0.9x^".to_string();
        assert!(AxisTransform::from_config(&config).is_err());
    }
}
