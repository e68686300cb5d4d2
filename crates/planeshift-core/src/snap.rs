//! Snap functionality for quantizing coordinates to attractor values.
//!
//! Unlike a uniform grid round, a value only snaps when its fractional part
//! falls inside one of three bands: near the integer below, near the integer
//! above, or near the half-integer in between. Anything else passes through.

use crate::config::SnapBands;
use kurbo::Point;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a scalar with the default bands.
pub fn snap_value(value: f64) -> f64 {
    snap_value_with(value, &SnapBands::default())
}

/// Snap a scalar to the nearest attractor inside `bands`.
///
/// Non-finite values are returned unchanged.
pub fn snap_value_with(value: f64, bands: &SnapBands) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let integer = value.floor();
    let fraction = value - integer;

    if fraction <= bands.lower {
        integer
    } else if fraction >= bands.upper {
        integer + 1.0
    } else if fraction >= bands.half_low && fraction <= bands.half_high {
        integer + 0.5
    } else {
        value
    }
}

/// Snap both coordinates of a point independently.
pub fn snap_point(point: Point, bands: &SnapBands) -> SnapResult {
    let x = snap_value_with(point.x, bands);
    let y = snap_value_with(point.y, bands);
    SnapResult {
        point: Point::new(x, y),
        snapped_x: x != point.x,
        snapped_y: y != point.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_bands() {
        assert!((snap_value(2.95) - 3.0).abs() < f64::EPSILON);
        assert!((snap_value(2.05) - 2.0).abs() < f64::EPSILON);
        assert!((snap_value(2.5) - 2.5).abs() < f64::EPSILON);
        assert!((snap_value(2.52) - 2.5).abs() < f64::EPSILON);
        assert!((snap_value(2.3) - 2.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_negative_values() {
        // floor(-1.95) = -2, fraction 0.05
        assert!((snap_value(-1.95) + 2.0).abs() < f64::EPSILON);
        // floor(-1.05) = -2, fraction 0.95
        assert!((snap_value(-1.05) + 1.0).abs() < f64::EPSILON);
        assert!((snap_value(-1.5) + 1.5).abs() < f64::EPSILON);
        assert!((snap_value(-1.3) + 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_idempotent_on_samples() {
        for i in -200..200 {
            let v = i as f64 * 0.037;
            let once = snap_value(v);
            assert_eq!(snap_value(once), once, "value {}", v);
        }
    }

    #[test]
    fn test_snap_non_finite_passthrough() {
        assert!(snap_value(f64::NAN).is_nan());
        assert_eq!(snap_value(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_snap_point_reports_axes() {
        let result = snap_point(Point::new(4.02, 7.3), &SnapBands::default());
        assert!(result.snapped_x);
        assert!(!result.snapped_y);
        assert!(result.is_snapped());
        assert!((result.point.x - 4.0).abs() < f64::EPSILON);

        let none = SnapResult::none(Point::new(1.0, 1.0));
        assert!(!none.is_snapped());
    }

    #[test]
    fn test_custom_bands() {
        let bands = SnapBands {
            lower: 0.2,
            upper: 0.8,
            half_low: 0.4,
            half_high: 0.6,
        };
        assert!((snap_value_with(1.15, &bands) - 1.0).abs() < f64::EPSILON);
        assert!((snap_value_with(1.85, &bands) - 2.0).abs() < f64::EPSILON);
        assert!((snap_value_with(1.42, &bands) - 1.5).abs() < f64::EPSILON);
    }
}
