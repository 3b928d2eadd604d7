//! Hu-invariant shape distance.
//!
//! Invariants are compared on a log scale so the metric is dominated by
//! relative shape change rather than the wildly different magnitudes of the
//! seven invariants.

#[inline]
fn inv_log_scale(h: f64) -> f64 {
    if h.abs() < 1e-30 {
        return 0.0;
    }
    let m = h.signum() * h.abs().log10();
    if m.abs() < 1e-12 {
        0.0
    } else {
        1.0 / m
    }
}

/// Sum of absolute differences of the reciprocal log-scaled invariants.
/// Zero for identical shapes; lower is more similar.
pub fn shape_distance(a: &[f64; 7], b: &[f64; 7]) -> f64 {
    let mut dist = 0.0;
    for i in 0..7 {
        dist += (inv_log_scale(a[i]) - inv_log_scale(b[i])).abs();
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_shapes_have_zero_distance() {
        let hu = [0.21, 0.003, 1e-5, 2e-6, -4e-11, 1e-8, -3e-11];
        assert_eq!(shape_distance(&hu, &hu), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = [0.2, 0.01, 1e-4, 1e-5, 1e-9, 1e-6, -1e-9];
        let b = [0.3, 0.02, 2e-4, 3e-5, -2e-9, 2e-6, 1e-9];
        assert_eq!(shape_distance(&a, &b), shape_distance(&b, &a));
    }

    #[test]
    fn zero_invariants_do_not_blow_up() {
        let a = [0.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let b = [0.2, 0.01, 0.0, 0.0, 0.0, 0.0, 0.0];
        let d = shape_distance(&a, &b);
        assert!(d.is_finite());
        assert!(d > 0.0);
    }

    #[test]
    fn closer_shapes_score_lower() {
        let base = [0.20, 0.010, 1e-4, 1e-5, 1e-9, 1e-6, 1e-9];
        let near = [0.21, 0.011, 1.1e-4, 1e-5, 1e-9, 1e-6, 1e-9];
        let far = [0.40, 0.100, 1e-3, 1e-4, 1e-7, 1e-5, 1e-7];
        assert!(shape_distance(&base, &near) < shape_distance(&base, &far));
    }
}
