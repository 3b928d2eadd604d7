//! Connected-component labeling and per-region statistics.
//!
//! Stack-based 8-connected region growing over the cleaned foreground mask.
//! Components outside the area band are labeled but produce no [`Blob`], so
//! a saturated frame degenerates to zero blobs rather than one giant one.

use super::hull::{convex_hull, polygon_area};
use crate::frame::{LabelMap, Mask};
use crate::types::{Blob, PixelRect};
use nalgebra::{Matrix2, SymmetricEigen};

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Running sums for one component while it is being grown.
struct RegionAccumulator {
    indices: Vec<usize>,
    sum_x: f64,
    sum_y: f64,
    sum_xx: f64,
    sum_yy: f64,
    sum_xy: f64,
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl RegionAccumulator {
    fn with_capacity(capacity: usize) -> Self {
        let mut acc = Self {
            indices: Vec::with_capacity(capacity),
            sum_x: 0.0,
            sum_y: 0.0,
            sum_xx: 0.0,
            sum_yy: 0.0,
            sum_xy: 0.0,
            min_x: usize::MAX,
            min_y: usize::MAX,
            max_x: 0,
            max_y: 0,
        };
        acc.reset();
        acc
    }

    fn reset(&mut self) {
        self.indices.clear();
        self.sum_x = 0.0;
        self.sum_y = 0.0;
        self.sum_xx = 0.0;
        self.sum_yy = 0.0;
        self.sum_xy = 0.0;
        self.min_x = usize::MAX;
        self.min_y = usize::MAX;
        self.max_x = 0;
        self.max_y = 0;
    }

    fn push(&mut self, idx: usize, x: usize, y: usize) {
        self.indices.push(idx);
        let xf = x as f64;
        let yf = y as f64;
        self.sum_x += xf;
        self.sum_y += yf;
        self.sum_xx += xf * xf;
        self.sum_yy += yf * yf;
        self.sum_xy += xf * yf;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn len(&self) -> usize {
        self.indices.len()
    }

    /// Turn the accumulated sums into a [`Blob`]; `None` when the covariance
    /// eigen-decomposition comes back non-finite.
    fn finalize(&self, label: u32, width: usize) -> Option<Blob> {
        let count = self.len() as f64;
        let cx = self.sum_x / count;
        let cy = self.sum_y / count;
        if !cx.is_finite() || !cy.is_finite() {
            return None;
        }

        let cxx = (self.sum_xx / count - cx * cx) as f32;
        let cyy = (self.sum_yy / count - cy * cy) as f32;
        let cxy = (self.sum_xy / count - cx * cy) as f32;
        let cov = Matrix2::new(cxx, cxy, cxy, cyy);
        let eig = SymmetricEigen::new(cov);
        let l0 = eig.eigenvalues[0];
        let l1 = eig.eigenvalues[1];
        if !l0.is_finite() || !l1.is_finite() {
            return None;
        }
        // 2-sigma half-extent on each side of the centroid.
        let major = 4.0 * l0.max(l1).max(0.0).sqrt();
        let minor = 4.0 * l0.min(l1).max(0.0).sqrt();

        let mut points: Vec<[f32; 2]> = self
            .indices
            .iter()
            .map(|&idx| [(idx % width) as f32, (idx / width) as f32])
            .collect();
        let hull = convex_hull(&mut points);
        let hull_area = polygon_area(&hull);
        let solidity = if hull_area <= f32::EPSILON {
            1.0
        } else {
            (count as f32 / hull_area).min(1.0)
        };
        if !solidity.is_finite() {
            return None;
        }

        Some(Blob {
            label,
            area: self.len() as u32,
            centroid: [cx as f32, cy as f32],
            bbox: PixelRect {
                x0: self.min_x,
                y0: self.min_y,
                x1: self.max_x + 1,
                y1: self.max_y + 1,
            },
            axis_major: major,
            axis_minor: minor,
            solidity,
        })
    }
}

pub(crate) struct LabelingOutcome {
    pub blobs: Vec<Blob>,
    /// Components found before any filtering.
    pub components: u32,
    /// Components dropped by the area band.
    pub rejected_area: u32,
    /// Components dropped because their statistics were non-finite.
    pub skipped_numeric: u32,
}

/// Label all 8-connected foreground components and keep those whose area lies
/// in `[min_area, max_area]`, both bounds inclusive.
pub(crate) fn label_components(
    mask: &Mask,
    labels: &mut LabelMap,
    stack: &mut Vec<usize>,
    min_area: u32,
    max_area: u32,
) -> LabelingOutcome {
    let w = mask.w;
    let h = mask.h;
    labels.reset(w, h);
    stack.clear();

    let mut outcome = LabelingOutcome {
        blobs: Vec::new(),
        components: 0,
        rejected_area: 0,
        skipped_numeric: 0,
    };
    let mut region = RegionAccumulator::with_capacity(256);
    let mut next_label = 0u32;

    for seed in 0..w * h {
        if mask.data[seed] == 0 || labels.labels[seed] != 0 {
            continue;
        }
        next_label += 1;
        outcome.components += 1;
        region.reset();

        labels.labels[seed] = next_label;
        stack.push(seed);
        while let Some(idx) = stack.pop() {
            let x = idx % w;
            let y = idx / w;
            region.push(idx, x, y);
            for (dx, dy) in NEIGH_OFFSETS {
                let xn = x as isize + dx;
                let yn = y as isize + dy;
                if xn < 0 || yn < 0 || xn >= w as isize || yn >= h as isize {
                    continue;
                }
                let neighbor = yn as usize * w + xn as usize;
                if mask.data[neighbor] == 0 || labels.labels[neighbor] != 0 {
                    continue;
                }
                labels.labels[neighbor] = next_label;
                stack.push(neighbor);
            }
        }

        let area = region.len() as u32;
        if area < min_area || area > max_area {
            outcome.rejected_area += 1;
            continue;
        }
        match region.finalize(next_label, w) {
            Some(blob) => outcome.blobs.push(blob),
            None => outcome.skipped_numeric += 1,
        }
    }

    outcome
}
