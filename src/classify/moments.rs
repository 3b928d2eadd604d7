//! Image moments and the seven Hu invariants of a binary mask.

use crate::frame::Mask;

/// Hu moment invariants of the foreground region. `None` for an empty mask.
pub(crate) fn hu_invariants(mask: &Mask) -> Option<[f64; 7]> {
    let mut m00 = 0.0f64;
    let mut m10 = 0.0f64;
    let mut m01 = 0.0f64;
    for y in 0..mask.h {
        for x in 0..mask.w {
            if mask.get(x, y) {
                m00 += 1.0;
                m10 += x as f64;
                m01 += y as f64;
            }
        }
    }
    if m00 <= 0.0 {
        return None;
    }
    let cx = m10 / m00;
    let cy = m01 / m00;

    let mut mu = [[0.0f64; 4]; 4];
    for y in 0..mask.h {
        for x in 0..mask.w {
            if !mask.get(x, y) {
                continue;
            }
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dx2 = dx * dx;
            let dy2 = dy * dy;
            mu[2][0] += dx2;
            mu[0][2] += dy2;
            mu[1][1] += dx * dy;
            mu[3][0] += dx2 * dx;
            mu[0][3] += dy2 * dy;
            mu[2][1] += dx2 * dy;
            mu[1][2] += dx * dy2;
        }
    }

    // eta_pq = mu_pq / m00^(1 + (p+q)/2)
    let n2 = m00 * m00;
    let n3 = n2 * m00.sqrt();
    let e20 = mu[2][0] / n2;
    let e02 = mu[0][2] / n2;
    let e11 = mu[1][1] / n2;
    let e30 = mu[3][0] / n3;
    let e03 = mu[0][3] / n3;
    let e21 = mu[2][1] / n3;
    let e12 = mu[1][2] / n3;

    let q1 = e30 + e12;
    let q2 = e21 + e03;
    let q1s = q1 * q1;
    let q2s = q2 * q2;

    let h = [
        e20 + e02,
        (e20 - e02) * (e20 - e02) + 4.0 * e11 * e11,
        (e30 - 3.0 * e12) * (e30 - 3.0 * e12) + (3.0 * e21 - e03) * (3.0 * e21 - e03),
        q1s + q2s,
        (e30 - 3.0 * e12) * q1 * (q1s - 3.0 * q2s) + (3.0 * e21 - e03) * q2 * (3.0 * q1s - q2s),
        (e20 - e02) * (q1s - q2s) + 4.0 * e11 * q1 * q2,
        (3.0 * e21 - e03) * q1 * (q1s - 3.0 * q2s) - (e30 - 3.0 * e12) * q2 * (3.0 * q1s - q2s),
    ];
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_at(w: usize, h: usize, x0: usize, y0: usize, side: usize) -> Mask {
        let mut m = Mask::new(w, h);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                m.set(x, y, true);
            }
        }
        m
    }

    /// L with an 8-long and a 5-long arm. `rotated` builds the same shape
    /// turned 90 degrees clockwise (not mirrored; h7 is mirror-sensitive).
    fn l_shape(w: usize, h: usize, x0: usize, y0: usize, rotated: bool) -> Mask {
        let mut m = Mask::new(w, h);
        if rotated {
            for i in 0..8 {
                m.set(x0 + i, y0, true);
            }
            for j in 0..5 {
                m.set(x0 + 7, y0 + j, true);
            }
        } else {
            for i in 0..8 {
                m.set(x0, y0 + i, true);
            }
            for j in 0..5 {
                m.set(x0 + j, y0, true);
            }
        }
        m
    }

    #[test]
    fn empty_mask_has_no_invariants() {
        assert!(hu_invariants(&Mask::new(6, 6)).is_none());
    }

    #[test]
    fn square_h1_near_one_sixth() {
        let hu = hu_invariants(&square_at(32, 32, 5, 5, 12)).unwrap();
        assert!((hu[0] - 1.0 / 6.0).abs() < 0.01, "h1 = {}", hu[0]);
        // Symmetric shape: the skew invariants vanish.
        assert!(hu[2].abs() < 1e-9);
        assert!(hu[3].abs() < 1e-9);
    }

    #[test]
    fn invariant_under_translation() {
        let a = hu_invariants(&square_at(40, 40, 2, 3, 9)).unwrap();
        let b = hu_invariants(&square_at(40, 40, 25, 18, 9)).unwrap();
        for i in 0..7 {
            assert!((a[i] - b[i]).abs() < 1e-12, "h{} differs", i + 1);
        }
    }

    #[test]
    fn invariant_under_quarter_rotation() {
        let a = hu_invariants(&l_shape(24, 24, 4, 4, false)).unwrap();
        let b = hu_invariants(&l_shape(24, 24, 4, 4, true)).unwrap();
        for i in 0..7 {
            let scale = a[i].abs().max(b[i].abs()).max(1e-12);
            assert!(
                ((a[i] - b[i]).abs() / scale) < 1e-6,
                "h{} differs: {} vs {}",
                i + 1,
                a[i],
                b[i]
            );
        }
    }
}
