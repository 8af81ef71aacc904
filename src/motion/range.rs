//! # Range Mapper
//!
//! Affine mapping of raw analog readings onto the normalized signed range.
//!
//! The mapping divides by `src_max` rather than by the span
//! `src_max - src_min`. With the default bounds (1..680 onto -1..1) this
//! puts `src_min` exactly on `dst_min` but lands `src_max` slightly short of
//! `dst_max` (`679 / 680 * 2 - 1 ≈ 0.99706`). Existing firmware is tuned
//! against this arithmetic, so it is kept as-is.
//!
//! No clamping is applied: readings outside `[src_min, src_max]` produce
//! values outside `[dst_min, dst_max]`.

/// Maps a raw reading onto the destination range.
///
/// Formula: `(val_src - src_min) / src_max * (dst_max - dst_min) + dst_min`
///
/// # Examples
///
/// ```
/// use analog_mouse_bridge::motion::range::map_val;
///
/// assert_eq!(map_val(1, 1, 680, -1.0, 1.0), -1.0);
/// assert!((map_val(680, 1, 680, -1.0, 1.0) - 0.997_058_8).abs() < 1e-6);
/// ```
#[must_use]
pub fn map_val(val_src: i32, src_min: i32, src_max: i32, dst_min: f64, dst_max: f64) -> f64 {
    // Subtract in f64: any i32 reading is accepted and the difference can overflow i32
    (f64::from(val_src) - f64::from(src_min)) / f64::from(src_max) * (dst_max - dst_min) + dst_min
}

/// Configured source and destination bounds for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeMap {
    /// Lowest expected raw reading.
    pub src_min: i32,
    /// Highest expected raw reading (also the divisor).
    pub src_max: i32,
    /// Normalized value for `src_min`.
    pub dst_min: f64,
    /// Nominal upper bound of the normalized range.
    pub dst_max: f64,
}

impl Default for RangeMap {
    fn default() -> Self {
        Self {
            src_min: 1,
            src_max: 680,
            dst_min: -1.0,
            dst_max: 1.0,
        }
    }
}

impl RangeMap {
    /// Creates a range map from raw and normalized bounds.
    #[must_use]
    pub fn new(src_min: i32, src_max: i32, dst_min: f64, dst_max: f64) -> Self {
        Self {
            src_min,
            src_max,
            dst_min,
            dst_max,
        }
    }

    /// Maps a raw reading with the configured bounds.
    #[must_use]
    pub fn map(&self, raw: i32) -> f64 {
        map_val(raw, self.src_min, self.src_max, self.dst_min, self.dst_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_src_min_maps_to_dst_min() {
        assert_eq!(map_val(1, 1, 680, -1.0, 1.0), -1.0);
    }

    #[test]
    fn test_src_max_falls_short_of_dst_max() {
        // 679 / 680 * 2 - 1
        let expected = 679.0 / 680.0 * 2.0 - 1.0;
        let mapped = map_val(680, 1, 680, -1.0, 1.0);
        assert_eq!(mapped, expected);
        assert!(mapped < 1.0);
        assert!((mapped - 1.0).abs() < 0.003);
    }

    #[test]
    fn test_midpoint_is_near_zero() {
        let mapped = map_val(340, 1, 680, -1.0, 1.0);
        assert!(mapped.abs() < 0.01, "midpoint mapped to {}", mapped);
        assert!(mapped < 0.0);
    }

    #[test]
    fn test_divisor_is_src_max_not_span() {
        // With src_min = 100 the span would be 100, the divisor stays 200.
        let mapped = map_val(200, 100, 200, 0.0, 1.0);
        assert!((mapped - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_input_is_not_clamped() {
        assert!(map_val(0, 1, 680, -1.0, 1.0) < -1.0);
        assert!(map_val(2000, 1, 680, -1.0, 1.0) > 1.0);
    }

    #[test]
    fn test_extreme_readings_keep_their_sign() {
        let low = map_val(i32::MIN, 1, 680, -1.0, 1.0);
        let high = map_val(i32::MAX, 1, 680, -1.0, 1.0);
        assert!(low.is_finite() && low < -1.0, "i32::MIN -> {}", low);
        assert!(high.is_finite() && high > 1.0, "i32::MAX -> {}", high);

        let expected = (f64::from(i32::MIN) - 1.0) / 680.0 * 2.0 - 1.0;
        assert_eq!(low, expected);
    }

    #[test]
    fn test_extreme_readings_with_negative_src_min() {
        let high = map_val(i32::MAX, -512, 512, -1.0, 1.0);
        let low = map_val(i32::MIN, -512, 512, -1.0, 1.0);
        assert!(high.is_finite() && high > 1.0, "i32::MAX -> {}", high);
        assert!(low.is_finite() && low < -1.0, "i32::MIN -> {}", low);
        assert_eq!(map_val(-512, -512, 512, -1.0, 1.0), -1.0);
    }

    #[test]
    fn test_in_range_output_stays_in_bounds() {
        for raw in 1..=680 {
            let mapped = map_val(raw, 1, 680, -1.0, 1.0);
            assert!((-1.0..=1.0).contains(&mapped), "raw {} -> {}", raw, mapped);
        }
    }

    #[test]
    fn test_range_map_matches_free_function() {
        let range = RangeMap::default();
        assert_eq!(range.map(512), map_val(512, 1, 680, -1.0, 1.0));

        let custom = RangeMap::new(0, 1023, -2.0, 2.0);
        assert_eq!(custom.map(0), -2.0);
    }
}
