//! Dual least-squares line fits for the cavity axis.
//!
//! A single `y = a + b*x` regression blows up for near-vertical axes, so the
//! fit runs both ways (y on x, then x on y) and keeps whichever slope has the
//! smaller standard error. Near-horizontal axes favor the first form,
//! near-vertical the second, and anything between is insensitive to the pick.

/// One regression outcome: the line direction plus the slope's standard error.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AxisFit {
    /// Unit direction along the fitted line.
    pub dir: [f32; 2],
    /// Standard error of the fitted slope.
    pub slope_se: f32,
}

struct Sums {
    n: f64,
    su: f64,
    sv: f64,
    suu: f64,
    suv: f64,
    svv: f64,
}

fn accumulate(points: &[(usize, usize)], swap: bool) -> Sums {
    let mut s = Sums {
        n: points.len() as f64,
        su: 0.0,
        sv: 0.0,
        suu: 0.0,
        suv: 0.0,
        svv: 0.0,
    };
    for &(x, y) in points {
        let (u, v) = if swap {
            (y as f64, x as f64)
        } else {
            (x as f64, y as f64)
        };
        s.su += u;
        s.sv += v;
        s.suu += u * u;
        s.suv += u * v;
        s.svv += v * v;
    }
    s
}

/// Regress `v = a + b*u`, returning the slope and its standard error.
/// `None` when there are fewer than two points or no variance in `u`.
fn regress(s: &Sums) -> Option<(f64, f64)> {
    if s.n < 2.0 {
        return None;
    }
    let var_u = s.suu - s.su * s.su / s.n;
    if !var_u.is_finite() || var_u < 1e-9 {
        return None;
    }
    let cov_uv = s.suv - s.su * s.sv / s.n;
    let b = cov_uv / var_u;
    // SSE via the closed form Svv_c - b * Suv_c.
    let var_v = s.svv - s.sv * s.sv / s.n;
    let sse = (var_v - b * cov_uv).max(0.0);
    let se = if s.n > 2.0 {
        (sse / (s.n - 2.0) / var_u).sqrt()
    } else {
        0.0
    };
    if !b.is_finite() || !se.is_finite() {
        return None;
    }
    Some((b, se))
}

/// Fit `y = a + b*x`; direction is `(1, b)` normalized.
pub(crate) fn fit_y_on_x(points: &[(usize, usize)]) -> Option<AxisFit> {
    let (b, se) = regress(&accumulate(points, false))?;
    let norm = (1.0 + b * b).sqrt();
    Some(AxisFit {
        dir: [(1.0 / norm) as f32, (b / norm) as f32],
        slope_se: se as f32,
    })
}

/// Fit `x = a + b*y`; direction is `(b, 1)` normalized.
pub(crate) fn fit_x_on_y(points: &[(usize, usize)]) -> Option<AxisFit> {
    let (b, se) = regress(&accumulate(points, true))?;
    let norm = (1.0 + b * b).sqrt();
    Some(AxisFit {
        dir: [(b / norm) as f32, (1.0 / norm) as f32],
        slope_se: se as f32,
    })
}

/// Axis direction from the better-conditioned of the two fits, sign
/// unresolved. `None` when both parameterizations are degenerate.
pub(crate) fn fit_axis(points: &[(usize, usize)]) -> Option<[f32; 2]> {
    match (fit_y_on_x(points), fit_x_on_y(points)) {
        (Some(a), Some(b)) => Some(if a.slope_se <= b.slope_se { a.dir } else { b.dir }),
        (Some(a), None) => Some(a.dir),
        (None, Some(b)) => Some(b.dir),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collinear(dir: [f32; 2], expect: [f32; 2], tol: f32) -> bool {
        // Sign-insensitive comparison.
        let dot = (dir[0] * expect[0] + dir[1] * expect[1]).abs();
        dot > 1.0 - tol
    }

    #[test]
    fn horizontal_points_fit_x_axis() {
        let pts: Vec<(usize, usize)> = (0..10).map(|x| (x, 4)).collect();
        assert!(fit_x_on_y(&pts).is_none(), "no variance in y");
        let dir = fit_axis(&pts).unwrap();
        assert!(collinear(dir, [1.0, 0.0], 1e-4));
    }

    #[test]
    fn vertical_points_fit_y_axis() {
        let pts: Vec<(usize, usize)> = (0..10).map(|y| (7, y)).collect();
        assert!(fit_y_on_x(&pts).is_none(), "no variance in x");
        let dir = fit_axis(&pts).unwrap();
        assert!(collinear(dir, [0.0, 1.0], 1e-4));
    }

    #[test]
    fn diagonal_points_fit_diagonal() {
        let pts: Vec<(usize, usize)> = (0..12).map(|i| (i, i)).collect();
        let dir = fit_axis(&pts).unwrap();
        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert!(collinear(dir, [s, s], 1e-4));
    }

    #[test]
    fn shallow_noisy_line_prefers_y_on_x() {
        // Slope 0.25 with +-1 jitter in y: x has far more spread than y.
        let pts: Vec<(usize, usize)> = (0..40)
            .map(|i| (i, i / 4 + usize::from(i % 3 == 0)))
            .collect();
        let yx = fit_y_on_x(&pts).unwrap();
        let xy = fit_x_on_y(&pts).unwrap();
        assert!(yx.slope_se < xy.slope_se);
        let dir = fit_axis(&pts).unwrap();
        assert!(collinear(dir, yx.dir, 1e-6));
    }

    #[test]
    fn single_point_is_degenerate_both_ways() {
        let pts = [(3usize, 3usize)];
        assert!(fit_axis(&pts).is_none());
        let dup = [(3usize, 3usize), (3, 3), (3, 3)];
        assert!(fit_axis(&dup).is_none());
    }
}
