#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod calib;
pub mod config;
pub mod coords;
pub mod detect;
pub mod diagnostics;
pub mod io;
pub mod rig;
pub mod track;
pub mod types;
pub mod viewport;

// “Expert” modules – still public, but considered unstable internals.
// (You can tighten or feature-gate these later.)
pub mod angle;
pub mod classify;
pub mod frame;
pub mod segment;
pub mod synthetic;

// --- High-level re-exports -------------------------------------------------

// Main entry points: extraction + tracking.
pub use crate::detect::{ExtractorParams, FrameDetections, MaskPredictor, ObjectExtractor};
pub use crate::track::{IdentityKey, IdentityTracker, TrackerParams};
pub use crate::types::Detection;

// Per-frame trace returned alongside detections.
pub use crate::diagnostics::FrameTrace;

// Coordinate plumbing that most embedders touch.
pub use crate::calib::CalibrationTable;
pub use crate::viewport::ViewportGeometry;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use microtrack::prelude::*;
///
/// # fn main() {
/// let (w, h) = (640usize, 480usize);
/// let pixels = vec![255u8; w * h];
/// let frame = FrameU8 {
///     w,
///     h,
///     stride: w,
///     data: &pixels,
/// };
///
/// let mut extractor = ObjectExtractor::new(ExtractorParams::default());
/// let result = extractor.extract(&frame);
/// println!(
///     "robots={} total_ms={:.3}",
///     result.detections.len(),
///     result.trace.timings.total_ms
/// );
/// # }
/// ```
pub mod prelude {
    pub use crate::coords::{CameraPoint, NormPoint, ProjectorPoint, ViewportPoint};
    pub use crate::frame::{FrameU8, GrayFrame, Mask};
    pub use crate::types::Detection;
    pub use crate::{
        ExtractorParams, IdentityKey, IdentityTracker, ObjectExtractor, TrackerParams,
    };
}
