//! Shape conformity gate and heading estimation.
//!
//! Microrobots image as hollow star-like bodies: a closed outer ring with
//! several legs and an off-center interior cavity. [`ShapeClassifier`] first
//! checks that a blob looks like that (axis ratio, solidity band, hollow
//! center, branch-point count), then recovers the heading from the cavity's
//! medial axis: the cavity sits opposite the direction the robot points.

mod contour;
mod linefit;
mod moments;
mod skeleton;

pub(crate) use contour::trace_boundary;
pub(crate) use moments::hu_invariants;

use crate::angle::direction_angle;
use crate::frame::Mask;
use crate::types::Blob;
use serde::{Deserialize, Serialize};

/// Conformity and orientation knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Largest accepted major/minor covariance axis ratio.
    pub max_axis_ratio: f32,
    /// Lower solidity bound, inclusive.
    pub solidity_min: f32,
    /// Upper solidity bound, inclusive.
    pub solidity_max: f32,
    /// Minimum skeleton branch points for the leg structure.
    pub min_branch_points: u32,
    /// Crop border band whose skeleton fragments are discarded as artifacts.
    pub axis_border_band_px: usize,
    /// Minimum raw-axis pixel count before the line fits run.
    pub min_axis_px: usize,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            max_axis_ratio: 1.3,
            solidity_min: 0.45,
            solidity_max: 0.75,
            min_branch_points: 5,
            axis_border_band_px: 1,
            min_axis_px: 2,
        }
    }
}

/// Why a blob failed the conformity gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Too elongated.
    AxisRatio,
    /// Solidity outside the accepted band.
    Solidity,
    /// Centroid pixel is foreground: the body is not hollow.
    SolidCenter,
    /// Too few skeleton branch points.
    BranchPoints,
    /// No usable cavity axis (missing, too short, or unfittable).
    DegenerateAxis,
}

/// Accepted-blob summary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeReport {
    /// Heading in radians, (-π, π].
    pub orientation: f32,
    /// Branch points found on the body skeleton.
    pub branch_points: u32,
}

/// A blob's padded mask crop together with its frame-space origin.
#[derive(Clone, Debug)]
pub struct BlobCrop {
    pub mask: Mask,
    /// Frame coordinates of the crop's top-left pixel.
    pub origin: (usize, usize),
}

/// Stateless classification stage; cheap to share across worker threads.
pub struct ShapeClassifier {
    params: ClassifierParams,
}

impl ShapeClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Orientation of a conforming blob, `None` when any gate rejects it.
    pub fn classify(&self, crop: &BlobCrop, blob: &Blob) -> Option<f32> {
        self.classify_detailed(crop, blob)
            .ok()
            .map(|report| report.orientation)
    }

    /// Full gate outcome, used by the pipeline to tally rejections.
    pub fn classify_detailed(
        &self,
        crop: &BlobCrop,
        blob: &Blob,
    ) -> Result<ShapeReport, RejectReason> {
        if blob.axis_ratio() > self.params.max_axis_ratio {
            return Err(RejectReason::AxisRatio);
        }
        if blob.solidity < self.params.solidity_min || blob.solidity > self.params.solidity_max {
            return Err(RejectReason::Solidity);
        }

        let cx = (blob.centroid[0].round() as i64 - crop.origin.0 as i64)
            .clamp(0, crop.mask.w as i64 - 1) as usize;
        let cy = (blob.centroid[1].round() as i64 - crop.origin.1 as i64)
            .clamp(0, crop.mask.h as i64 - 1) as usize;
        if crop.mask.get(cx, cy) {
            return Err(RejectReason::SolidCenter);
        }

        let mut body_skel = crop.mask.clone();
        skeleton::skeletonize(&mut body_skel);
        let branch_points = skeleton::branch_point_count(&body_skel);
        if branch_points < self.params.min_branch_points {
            return Err(RejectReason::BranchPoints);
        }

        let dir = self.cavity_axis(crop, blob)?;
        Ok(ShapeReport {
            orientation: direction_angle(dir),
            branch_points,
        })
    }

    /// Signed heading direction from the cavity medial axis.
    fn cavity_axis(&self, crop: &BlobCrop, blob: &Blob) -> Result<[f32; 2], RejectReason> {
        let mut cavity = invert(&crop.mask);
        clear_border_connected(&mut cavity);
        skeleton::skeletonize(&mut cavity);
        let axis = skeleton::largest_interior_fragment(&cavity, self.params.axis_border_band_px)
            .ok_or(RejectReason::DegenerateAxis)?;
        if axis.len() < self.params.min_axis_px {
            return Err(RejectReason::DegenerateAxis);
        }

        let mut dir = linefit::fit_axis(&axis).ok_or(RejectReason::DegenerateAxis)?;

        // The cavity is offset toward the robot's tail; point away from it.
        let inv_len = 1.0 / axis.len() as f32;
        let raw_cx = axis.iter().map(|&(x, _)| x as f32).sum::<f32>() * inv_len;
        let raw_cy = axis.iter().map(|&(_, y)| y as f32).sum::<f32>() * inv_len;
        let blob_cx = blob.centroid[0] - crop.origin.0 as f32;
        let blob_cy = blob.centroid[1] - crop.origin.1 as f32;
        let toward_cavity = dir[0] * (raw_cx - blob_cx) + dir[1] * (raw_cy - blob_cy);
        if toward_cavity > 0.0 {
            dir = [-dir[0], -dir[1]];
        }
        Ok(dir)
    }
}

fn invert(mask: &Mask) -> Mask {
    let mut out = Mask::new(mask.w, mask.h);
    for (dst, &src) in out.data.iter_mut().zip(mask.data.iter()) {
        *dst = if src == 0 { 255 } else { 0 };
    }
    out
}

/// Clear every foreground pixel 8-connected to the mask border.
fn clear_border_connected(mask: &mut Mask) {
    if mask.w == 0 || mask.h == 0 {
        return;
    }
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for x in 0..mask.w {
        for y in [0, mask.h - 1] {
            if mask.get(x, y) {
                mask.set(x, y, false);
                stack.push((x, y));
            }
        }
    }
    for y in 0..mask.h {
        for x in [0, mask.w - 1] {
            if mask.get(x, y) {
                mask.set(x, y, false);
                stack.push((x, y));
            }
        }
    }
    while let Some((x, y)) = stack.pop() {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= mask.w as i32 || ny >= mask.h as i32 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if mask.get(nx, ny) {
                    mask.set(nx, ny, false);
                    stack.push((nx, ny));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelRect;

    fn blob_for(crop: &BlobCrop) -> Blob {
        // Recompute simple stats straight from the crop.
        let mut sum_x = 0.0f64;
        let mut sum_y = 0.0f64;
        let mut n = 0u32;
        for y in 0..crop.mask.h {
            for x in 0..crop.mask.w {
                if crop.mask.get(x, y) {
                    sum_x += (x + crop.origin.0) as f64;
                    sum_y += (y + crop.origin.1) as f64;
                    n += 1;
                }
            }
        }
        Blob {
            label: 1,
            area: n,
            centroid: [
                (sum_x / n as f64) as f32,
                (sum_y / n as f64) as f32,
            ],
            bbox: PixelRect {
                x0: crop.origin.0,
                y0: crop.origin.1,
                x1: crop.origin.0 + crop.mask.w,
                y1: crop.origin.1 + crop.mask.h,
            },
            axis_major: 1.0,
            axis_minor: 1.0,
            solidity: 0.6,
        }
    }

    /// Solid box with an elongated cavity carved from the center toward
    /// `tail`; the heading must come out pointing the opposite way.
    fn hollow_box_crop(tail: [i32; 2]) -> BlobCrop {
        let size = 41usize;
        let c = 20i32;
        let mut mask = Mask::new(size, size);
        for y in 6..35 {
            for x in 6..35 {
                let dx = x as i32 - c;
                let dy = y as i32 - c;
                let along = dx * tail[0] + dy * tail[1];
                let across = dx * tail[1] - dy * tail[0];
                let in_cavity = (0..10).contains(&along) && across.abs() <= 2;
                mask.set(x, y, !in_cavity);
            }
        }
        BlobCrop {
            mask,
            origin: (0, 0),
        }
    }

    #[test]
    fn cavity_axis_points_away_from_cavity() {
        let classifier = ShapeClassifier::new(ClassifierParams::default());
        let cases: [([i32; 2], f32); 8] = [
            ([-1, 0], 0.0),
            ([1, 0], std::f32::consts::PI),
            ([0, -1], std::f32::consts::FRAC_PI_2),
            ([0, 1], -std::f32::consts::FRAC_PI_2),
            // Diagonal tails offset the cavity into a quadrant proper, so the
            // sign flip has to get both components right at once.
            ([1, 1], -3.0 * std::f32::consts::FRAC_PI_4),
            ([1, -1], 3.0 * std::f32::consts::FRAC_PI_4),
            ([-1, 1], -std::f32::consts::FRAC_PI_4),
            ([-1, -1], std::f32::consts::FRAC_PI_4),
        ];
        for (tail, expected) in cases {
            let crop = hollow_box_crop(tail);
            let blob = blob_for(&crop);
            let dir = classifier.cavity_axis(&crop, &blob).unwrap();
            let angle = direction_angle(dir);
            let diff = crate::angle::angular_difference(angle, expected);
            assert!(
                diff < 5.0f32.to_radians(),
                "tail {tail:?}: got {angle:.3}, want {expected:.3}"
            );
        }
    }

    #[test]
    fn solid_center_is_rejected() {
        let mut mask = Mask::new(21, 21);
        for y in 4..17 {
            for x in 4..17 {
                mask.set(x, y, true);
            }
        }
        let crop = BlobCrop {
            mask,
            origin: (0, 0),
        };
        let blob = blob_for(&crop);
        let classifier = ShapeClassifier::new(ClassifierParams::default());
        assert_eq!(
            classifier.classify_detailed(&crop, &blob),
            Err(RejectReason::SolidCenter)
        );
        assert!(classifier.classify(&crop, &blob).is_none());
    }

    #[test]
    fn elongated_blob_is_rejected_first() {
        let crop = BlobCrop {
            mask: Mask::new(4, 4),
            origin: (0, 0),
        };
        let mut blob = blob_for(&crop);
        blob.axis_major = 10.0;
        blob.axis_minor = 5.0;
        let classifier = ShapeClassifier::new(ClassifierParams::default());
        assert_eq!(
            classifier.classify_detailed(&crop, &blob),
            Err(RejectReason::AxisRatio)
        );
    }

    #[test]
    fn solidity_band_is_enforced() {
        let crop = BlobCrop {
            mask: Mask::new(4, 4),
            origin: (0, 0),
        };
        let mut blob = blob_for(&crop);
        blob.solidity = 0.9;
        let classifier = ShapeClassifier::new(ClassifierParams::default());
        assert_eq!(
            classifier.classify_detailed(&crop, &blob),
            Err(RejectReason::Solidity)
        );
        blob.solidity = 0.3;
        assert_eq!(
            classifier.classify_detailed(&crop, &blob),
            Err(RejectReason::Solidity)
        );
    }

    #[test]
    fn border_clearing_keeps_enclosed_cavity() {
        let mut mask = Mask::new(11, 11);
        // Ring of foreground with one enclosed hole and open background.
        for y in 2..9 {
            for x in 2..9 {
                mask.set(x, y, true);
            }
        }
        mask.set(5, 5, false);
        let mut inv = invert(&mask);
        clear_border_connected(&mut inv);
        assert!(inv.get(5, 5), "enclosed cavity must survive");
        assert_eq!(inv.count(), 1, "open background must be cleared");
    }
}
