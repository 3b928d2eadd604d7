//! Hardware seams of the acquisition rig.
//!
//! The worker talks to the sensor and the display through these two traits
//! so the loop can run against real devices in the lab and against scripted
//! doubles in tests.

use crate::frame::{GrayFrame, Mask};

/// Grayscale frame source.
///
/// `next_frame` blocks until the sensor delivers the next exposure and
/// returns frames in acquisition order. Transient grab failures are reported
/// as `Err`; the acquisition loop logs them and keeps going.
pub trait Camera: Send {
    fn next_frame(&mut self) -> Result<GrayFrame, String>;

    /// Set the sensor exposure time in milliseconds.
    fn set_exposure(&mut self, ms: f32) -> Result<(), String>;
}

/// Display endpoint for acquired frames.
///
/// The worker hands over every frame it grabs together with the current
/// detection overlay; the sink owns the final compositing (tinting, scaling
/// to the viewport). `overlay` is `None` until the first detection pass and
/// again after detection is switched off.
pub trait FrameSink: Send {
    fn present(&mut self, frame: &GrayFrame, overlay: Option<&Mask>);
}
