//! Semantic coordinate spaces used across the pipeline.
//!
//! The rig juggles four coordinate systems: raw camera pixels, pointer
//! positions on the (letterboxed) display surface, normalized frame
//! coordinates, and projector-device coordinates. Each gets its own wrapper
//! type so a mix-up is a compile error rather than a subtly wrong overlay.
//! Conversions go through [`crate::viewport::ViewportGeometry`] and
//! [`crate::calib::CalibrationTable`]; there are deliberately no blanket
//! `From` impls between spaces.

use serde::{Deserialize, Serialize};

/// A point in camera-frame pixels at native sensor resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPoint {
    pub x: f32,
    pub y: f32,
}

impl CameraPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Normalize by the native frame dimensions.
    pub fn to_norm(self, frame_w: u32, frame_h: u32) -> NormPoint {
        NormPoint {
            x: self.x / frame_w.max(1) as f32,
            y: self.y / frame_h.max(1) as f32,
        }
    }
}

/// A pointer position in display-surface pixels (viewport space).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportPoint {
    pub x: f32,
    pub y: f32,
}

impl ViewportPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point in normalized frame coordinates, `[0, 1]` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

impl NormPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another normalized point.
    pub fn distance_to(self, other: NormPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Scale back to camera pixels given the native frame dimensions.
    pub fn to_camera(self, frame_w: u32, frame_h: u32) -> CameraPoint {
        CameraPoint {
            x: self.x * frame_w as f32,
            y: self.y * frame_h as f32,
        }
    }
}

/// A point in projector device-native coordinates (DMD grid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorPoint {
    pub x: u32,
    pub y: u32,
}

impl ProjectorPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}
