//! Angle utilities used across the detection pipeline.
//!
//! Orientations are full-circle: a robot pointing "left" is not the same as
//! one pointing "right", so nothing here folds antipodal directions together.

use std::f32::consts::PI;

/// Normalizes an angle into the range (-π, π].
#[inline]
pub fn normalize_signed(angle: f32) -> f32 {
    let mut norm = angle.rem_euclid(2.0 * PI);
    if norm > PI {
        norm -= 2.0 * PI;
    }
    norm
}

/// Angle of a 2D direction vector in (-π, π], measured from the +x axis
/// with image-style +y pointing down.
#[inline]
pub fn direction_angle(dir: [f32; 2]) -> f32 {
    normalize_signed(dir[1].atan2(dir[0]))
}

/// Smallest unsigned difference between two full-circle angles, in [0, π].
#[inline]
pub fn angular_difference(a: f32, b: f32) -> f32 {
    normalize_signed(a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn normalize_signed_basic() {
        assert!(approx_eq(normalize_signed(0.5), 0.5));
        assert!(approx_eq(normalize_signed(-0.5), -0.5));
        assert!(approx_eq(normalize_signed(PI), PI));
        assert!(approx_eq(normalize_signed(-PI), PI));
        assert!(approx_eq(normalize_signed(3.0 * PI), PI));
        assert!(approx_eq(normalize_signed(2.5 * PI), 0.5 * PI));
    }

    #[test]
    fn direction_angle_quadrants() {
        assert!(approx_eq(direction_angle([1.0, 0.0]), 0.0));
        assert!(approx_eq(direction_angle([0.0, 1.0]), PI / 2.0));
        assert!(approx_eq(direction_angle([-1.0, 0.0]), PI));
        assert!(approx_eq(direction_angle([0.0, -1.0]), -PI / 2.0));
    }

    #[test]
    fn angular_difference_is_symmetric() {
        let a = 0.25f32;
        let b = 1.7f32;
        assert!(approx_eq(angular_difference(a, b), angular_difference(b, a)));
    }

    #[test]
    fn angular_difference_handles_wrap() {
        assert!(approx_eq(angular_difference(PI - 0.1, -PI + 0.1), 0.2));
        assert!(approx_eq(angular_difference(0.0, PI), PI));
        assert!(approx_eq(angular_difference(0.0, -PI / 2.0), PI / 2.0));
    }
}
