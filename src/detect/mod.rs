//! Object detection orchestration.
//!
//! Overview
//! - Segments the frame into candidate blobs ([`crate::segment`]).
//! - Gates each blob through the shape classifier ([`crate::classify`]),
//!   in parallel when the `parallel` feature is enabled.
//! - Builds the display overlay from the accepted masks.
//! - Reports per-stage counters and timings ([`crate::diagnostics`]).
//!
//! Modules
//! - [`params`] – configuration types used by the extractor and the demos.
//! - `pipeline` – the main [`ObjectExtractor`] implementation.

pub mod params;
mod pipeline;

pub use params::ExtractorParams;
pub use pipeline::{FrameDetections, ObjectExtractor};

use crate::frame::{FrameU8, Mask};

/// Black-box foreground predictor, typically an external segmentation model.
///
/// A failed prediction is logged and the pass degrades to plain thresholding;
/// implementations should return `Err` rather than panic.
pub trait MaskPredictor: Send {
    /// Predict a frame-sized foreground mask for one frame.
    fn predict(&mut self, frame: &FrameU8<'_>) -> Result<Mask, String>;
}
