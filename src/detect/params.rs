//! Parameter types configuring the detection pass.

use crate::classify::ClassifierParams;
use crate::segment::SegmenterParams;
use serde::{Deserialize, Serialize};

/// Detection-wide parameters aggregating the per-stage knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorParams {
    /// Segmentation stage knobs.
    pub segmenter: SegmenterParams,
    /// Conformity gate and orientation knobs.
    pub classifier: ClassifierParams,
    /// Border padding around each blob crop before classification, so the
    /// inverse-mask skeleton has room to breathe (px).
    pub mask_pad_px: usize,
    /// Margin added to half the larger bbox extent for the marker radius (px).
    pub radius_margin_px: usize,
    /// Dilation radius applied to the overlay union mask (px).
    pub overlay_dilate_px: usize,
}

impl Default for ExtractorParams {
    fn default() -> Self {
        Self {
            segmenter: SegmenterParams::default(),
            classifier: ClassifierParams::default(),
            mask_pad_px: 8,
            radius_margin_px: 5,
            overlay_dilate_px: 10,
        }
    }
}
