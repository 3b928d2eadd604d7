use crate::coords::CameraPoint;
use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle, `x0/y0` inclusive and `x1/y1` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl PixelRect {
    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    pub fn center(&self) -> [f32; 2] {
        [
            (self.x0 + self.x1) as f32 * 0.5,
            (self.y0 + self.y1) as f32 * 0.5,
        ]
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Grow by `pad` on every side, clamped to `[0, w) x [0, h)`.
    pub fn padded(&self, pad: usize, w: usize, h: usize) -> PixelRect {
        PixelRect {
            x0: self.x0.saturating_sub(pad),
            y0: self.y0.saturating_sub(pad),
            x1: (self.x1 + pad).min(w),
            y1: (self.y1 + pad).min(h),
        }
    }
}

/// A connected foreground region with the stats the classifier gates on.
#[derive(Clone, Debug, Serialize)]
pub struct Blob {
    /// Label in the frame's [`crate::frame::LabelMap`], 1-based.
    pub label: u32,
    /// Foreground pixel count.
    pub area: u32,
    /// Intensity-unweighted centroid in frame pixels.
    pub centroid: [f32; 2],
    /// Tight bounding box in frame pixels.
    pub bbox: PixelRect,
    /// Full length of the major covariance axis, in pixels.
    pub axis_major: f32,
    /// Full length of the minor covariance axis, in pixels.
    pub axis_minor: f32,
    /// Area over convex hull area, in (0, 1].
    pub solidity: f32,
}

impl Blob {
    /// Major-to-minor axis length ratio; large for elongated regions.
    pub fn axis_ratio(&self) -> f32 {
        self.axis_major / self.axis_minor.max(1e-6)
    }
}

/// Scale- and rotation-invariant shape summary of a detected robot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    /// Hu moment invariants of the binary mask.
    pub hu: [f64; 7],
    /// Outer contour in frame pixels, for display and export.
    pub contour: Vec<[f32; 2]>,
}

/// A robot accepted by the classifier on one frame.
#[derive(Clone, Debug, Serialize)]
pub struct Detection {
    /// Mask centroid in camera pixels.
    pub center: CameraPoint,
    /// Enclosing circle radius around `center`, in pixels.
    pub radius: f32,
    /// Heading in radians, (-π, π], +x axis zero, +y down.
    pub orientation: f32,
    /// Shape summary used for identity matching.
    pub shape: ShapeDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_padding_clamps_to_frame() {
        let r = PixelRect {
            x0: 2,
            y0: 3,
            x1: 10,
            y1: 8,
        };
        let p = r.padded(5, 12, 9);
        assert_eq!(
            p,
            PixelRect {
                x0: 0,
                y0: 0,
                x1: 12,
                y1: 9
            }
        );
        assert_eq!(p.width(), 12);
        assert_eq!(p.height(), 9);
    }

    #[test]
    fn rect_center_is_half_open_midpoint() {
        let r = PixelRect {
            x0: 0,
            y0: 0,
            x1: 4,
            y1: 2,
        };
        assert_eq!(r.center(), [2.0, 1.0]);
        assert!(r.contains(3, 1));
        assert!(!r.contains(4, 1));
    }
}
