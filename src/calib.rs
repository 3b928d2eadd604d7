//! Camera-to-projector calibration lookup.
//!
//! The rig is calibrated offline by sweeping the projector and recording
//! where each spot lands on the camera. The artifact of that sweep is a
//! dense per-pixel table: for every camera pixel, the projector coordinates
//! that illuminate it. At runtime the mapping is a single indexed read, so
//! targeting stays cheap enough to run on every click.

use crate::coords::{CameraPoint, NormPoint, ProjectorPoint};
use crate::io::{read_json_file, write_json_file};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Region of the camera frame covered by the calibration sweep, in
/// normalized frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibRect {
    pub min: NormPoint,
    pub max: NormPoint,
}

impl CalibRect {
    pub fn contains(&self, p: NormPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Dense camera-to-projector lookup table.
///
/// `map` is row-major over camera pixels: entry `y * width + x` holds the
/// projector coordinates for camera pixel `(x, y)`. Entries outside the
/// calibrated [`CalibRect`] are extrapolated by the sweep fit and unreliable;
/// callers gate on [`CalibrationTable::contains`] before converting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationTable {
    width: u32,
    height: u32,
    map: Vec<[f32; 2]>,
    bounds: CalibRect,
}

impl CalibrationTable {
    /// Assemble a table from its parts, validating the dimensions and the
    /// map length. Zero-sized tables are rejected so every constructed table
    /// has an edge entry for [`CalibrationTable::to_projector`] to clamp to.
    pub fn from_parts(
        width: u32,
        height: u32,
        map: Vec<[f32; 2]>,
        bounds: CalibRect,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("calibration table is empty ({width}x{height})"));
        }
        let expected = width as usize * height as usize;
        if map.len() != expected {
            return Err(format!(
                "calibration map has {} entries, expected {}x{} = {}",
                map.len(),
                width,
                height,
                expected
            ));
        }
        Ok(Self {
            width,
            height,
            map,
            bounds,
        })
    }

    /// Load a table from the JSON artifact produced by the calibration sweep.
    pub fn load(path: &Path) -> Result<Self, String> {
        let table: CalibrationTable = read_json_file(path)?;
        Self::from_parts(table.width, table.height, table.map, table.bounds)
            .map_err(|e| format!("calibration table {}: {e}", path.display()))
    }

    /// Write the table as JSON. Intended for demo and test fixtures.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        write_json_file(path, self)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> CalibRect {
        self.bounds
    }

    /// Whether a normalized frame point falls inside the calibrated region.
    pub fn contains(&self, p: NormPoint) -> bool {
        self.bounds.contains(p)
    }

    /// Projector coordinates for a camera point, by rounding to the nearest
    /// pixel and reading the table.
    ///
    /// Callers check [`CalibrationTable::contains`] first; out-of-frame
    /// points are clamped to the edge entry.
    pub fn to_projector(&self, p: CameraPoint) -> ProjectorPoint {
        let x = (p.x.round().max(0.0) as u32).min(self.width.saturating_sub(1));
        let y = (p.y.round().max(0.0) as u32).min(self.height.saturating_sub(1));
        let [px, py] = self.map[(y * self.width + x) as usize];
        ProjectorPoint {
            x: px.round().max(0.0) as u32,
            y: py.round().max(0.0) as u32,
        }
    }
}
