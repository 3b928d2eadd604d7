//! Diagnostics data model exposed by the detection pass and the demos.
//!
//! [`FrameTrace`] describes one full pass of the
//! [`ObjectExtractor`](crate::detect::ObjectExtractor): what went in, how long
//! each stage took, and where candidate blobs were lost. Everything here is
//! serde-serializable so demos can dump traces as JSON for offline tuning.

pub mod timing;

pub use timing::{elapsed_ms, TimingBreakdown};

use crate::classify::RejectReason;
use crate::segment::SegmentationStats;
use serde::Serialize;

/// End-to-end trace of one detection pass.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub segmentation: SegmentationStats,
    pub classification: ClassificationStage,
    pub overlay: OverlayStage,
}

/// Dimensions of the processed frame.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

/// Gate outcome counters for the classification stage.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationStage {
    /// Blobs that reached the classifier.
    pub evaluated: u32,
    /// Blobs that passed every gate.
    pub accepted: u32,
    pub rejections: RejectionTally,
}

/// Per-reason rejection counts.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionTally {
    pub axis_ratio: u32,
    pub solidity: u32,
    pub solid_center: u32,
    pub branch_points: u32,
    pub degenerate_axis: u32,
}

impl RejectionTally {
    pub fn record(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::AxisRatio => self.axis_ratio += 1,
            RejectReason::Solidity => self.solidity += 1,
            RejectReason::SolidCenter => self.solid_center += 1,
            RejectReason::BranchPoints => self.branch_points += 1,
            RejectReason::DegenerateAxis => self.degenerate_axis += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.axis_ratio + self.solidity + self.solid_center + self.branch_points
            + self.degenerate_axis
    }
}

/// Overlay-construction summary.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStage {
    /// Dilation radius applied to the union mask.
    pub dilate_px: usize,
    /// Foreground pixels in the final overlay.
    pub foreground_px: usize,
}
