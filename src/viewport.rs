//! Display-surface to frame-coordinate mapping.
//!
//! The live view scales the camera frame to fill the viewport height and
//! centers it horizontally, leaving equal dead bands left and right when the
//! viewport is wider than the scaled frame. Pointer positions arrive in
//! viewport pixels; everything downstream wants normalized frame
//! coordinates. The geometry is cheap to build, so the UI constructs a fresh
//! one on every resize instead of mutating a shared instance.

use crate::coords::{NormPoint, ViewportPoint};

/// Letterbox geometry of the live view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportGeometry {
    viewport_w: f32,
    viewport_h: f32,
    content_w: f32,
}

impl ViewportGeometry {
    pub fn new(viewport_w: f32, viewport_h: f32, content_w: f32) -> Self {
        Self {
            viewport_w,
            viewport_h,
            content_w,
        }
    }

    /// Geometry for a frame scaled to fill the viewport height, preserving
    /// the frame's aspect ratio.
    pub fn fit(viewport_w: f32, viewport_h: f32, frame_w: u32, frame_h: u32) -> Self {
        let aspect = frame_w as f32 / frame_h.max(1) as f32;
        Self {
            viewport_w,
            viewport_h,
            content_w: viewport_h * aspect,
        }
    }

    /// Width of each horizontal dead band.
    pub fn inset(&self) -> f32 {
        (self.viewport_w - self.content_w) * 0.5
    }

    /// Map a pointer position to normalized frame coordinates.
    ///
    /// Positions inside the dead bands map outside `[0, 1]` on x, which lets
    /// callers recognize clicks that missed the frame.
    pub fn to_frame_normalized(&self, p: ViewportPoint) -> NormPoint {
        NormPoint {
            x: (p.x - self.inset()) / self.content_w.max(1.0),
            y: p.y / self.viewport_h.max(1.0),
        }
    }

    /// Map a normalized frame point back to viewport pixels.
    pub fn to_viewport(&self, n: NormPoint) -> ViewportPoint {
        ViewportPoint {
            x: n.x * self.content_w + self.inset(),
            y: n.y * self.viewport_h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_click_hits_frame_center() {
        let geom = ViewportGeometry::new(800.0, 600.0, 750.0);
        let n = geom.to_frame_normalized(ViewportPoint::new(400.0, 300.0));
        assert!((n.x - 0.5).abs() < 1e-6);
        assert!((n.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn dead_band_maps_outside_unit_range() {
        let geom = ViewportGeometry::new(800.0, 600.0, 750.0);
        assert!(geom.inset() > 0.0);
        let n = geom.to_frame_normalized(ViewportPoint::new(10.0, 300.0));
        assert!(n.x < 0.0);
        let n = geom.to_frame_normalized(ViewportPoint::new(790.0, 300.0));
        assert!(n.x > 1.0);
    }

    #[test]
    fn round_trip_stays_within_a_pixel() {
        let geom = ViewportGeometry::new(1278.0, 601.0, 1133.5);
        for &(x, y) in &[(0.0, 0.0), (640.0, 300.0), (1201.7, 599.2), (73.25, 0.5)] {
            let p = ViewportPoint::new(x, y);
            let back = geom.to_viewport(geom.to_frame_normalized(p));
            assert!((back.x - p.x).abs() <= 1.0, "x drifted: {} -> {}", p.x, back.x);
            assert!((back.y - p.y).abs() <= 1.0, "y drifted: {} -> {}", p.y, back.y);
        }
    }

    #[test]
    fn fit_preserves_frame_aspect() {
        let geom = ViewportGeometry::fit(1000.0, 600.0, 640, 480);
        assert!((geom.inset() - 100.0).abs() < 1e-3);
        let n = geom.to_frame_normalized(ViewportPoint::new(500.0, 300.0));
        assert!((n.x - 0.5).abs() < 1e-6);
        assert!((n.y - 0.5).abs() < 1e-6);
    }
}
