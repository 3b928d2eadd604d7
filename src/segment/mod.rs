//! Foreground segmentation: gamma, adaptive threshold, morphology, labeling.
//!
//! [`FrameSegmenter`] turns one grayscale frame into the list of candidate
//! [`Blob`]s the shape classifier will inspect. All scratch buffers are owned
//! by the segmenter and reused across frames, so steady-state segmentation
//! does not allocate.

mod hull;
mod labeling;
mod morphology;
mod threshold;

pub(crate) use morphology::{dilate, DiskKernel};

use crate::frame::{FrameU8, LabelMap, Mask};
use crate::types::Blob;
use serde::{Deserialize, Serialize};

/// Knobs for the segmentation stages, in pipeline order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterParams {
    /// Gamma transfer applied before thresholding; 1.0 disables it.
    pub gamma: f32,
    /// Half-size of the square local-mean window, in pixels.
    pub threshold_radius: usize,
    /// Intensity margin against the local mean before a pixel is foreground.
    pub threshold_offset: f32,
    /// Foreground is darker than the local mean when set, brighter otherwise.
    pub dark_objects: bool,
    /// Disk radius for the opening pass; 0 disables it.
    pub open_radius: usize,
    /// Disk radius for the closing pass; 0 disables it.
    pub close_radius: usize,
    /// Smallest component area kept, inclusive (px^2).
    pub min_area: u32,
    /// Largest component area kept, inclusive (px^2).
    pub max_area: u32,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            threshold_radius: 15,
            threshold_offset: 10.0,
            dark_objects: true,
            open_radius: 1,
            close_radius: 2,
            min_area: 500,
            max_area: 10_000,
        }
    }
}

/// Per-frame segmentation counters, embedded in the detection trace.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationStats {
    /// Foreground pixels after morphology.
    pub foreground_px: usize,
    /// Connected components before filtering.
    pub components: u32,
    /// Components outside the area band.
    pub rejected_area: u32,
    /// Components with non-finite statistics.
    pub skipped_numeric: u32,
}

/// Workspace-backed segmentation stage.
pub struct FrameSegmenter {
    params: SegmenterParams,
    lut: [u8; 256],
    open_kernel: DiskKernel,
    close_kernel: DiskKernel,
    gamma_buf: Vec<u8>,
    integral: threshold::IntegralImage,
    mask: Mask,
    scratch: Mask,
    labels: LabelMap,
    stack: Vec<usize>,
    stats: SegmentationStats,
}

impl FrameSegmenter {
    pub fn new(params: SegmenterParams) -> Self {
        let lut = threshold::gamma_lut(params.gamma);
        let open_kernel = DiskKernel::new(params.open_radius);
        let close_kernel = DiskKernel::new(params.close_radius);
        Self {
            params,
            lut,
            open_kernel,
            close_kernel,
            gamma_buf: Vec::new(),
            integral: threshold::IntegralImage::new(),
            mask: Mask::new(0, 0),
            scratch: Mask::new(0, 0),
            labels: LabelMap::new(0, 0),
            stack: Vec::new(),
            stats: SegmentationStats::default(),
        }
    }

    pub fn params(&self) -> &SegmenterParams {
        &self.params
    }

    /// Replace the parameters, rebuilding the derived tables.
    pub fn set_params(&mut self, params: SegmenterParams) {
        self.lut = threshold::gamma_lut(params.gamma);
        self.open_kernel = DiskKernel::new(params.open_radius);
        self.close_kernel = DiskKernel::new(params.close_radius);
        self.params = params;
    }

    /// Segment one frame into area-filtered blobs.
    pub fn segment(&mut self, frame: &FrameU8<'_>) -> Vec<Blob> {
        self.segment_with_prior(frame, None)
    }

    /// Segment with an optional external foreground prior; the prior is
    /// intersected with the thresholded mask before labeling.
    pub fn segment_with_prior(&mut self, frame: &FrameU8<'_>, prior: Option<&Mask>) -> Vec<Blob> {
        threshold::apply_gamma(frame, &self.lut, &mut self.gamma_buf);
        threshold::adaptive_threshold(
            &self.gamma_buf,
            frame.w,
            frame.h,
            self.params.threshold_radius,
            self.params.threshold_offset,
            self.params.dark_objects,
            &mut self.integral,
            &mut self.mask,
        );
        morphology::open(&mut self.mask, &mut self.scratch, &self.open_kernel);
        morphology::close(&mut self.mask, &mut self.scratch, &self.close_kernel);
        if let Some(prior) = prior {
            if prior.w == frame.w && prior.h == frame.h {
                self.mask.intersect_with(prior);
            } else {
                log::warn!(
                    "foreground prior {}x{} does not match frame {}x{}; ignoring",
                    prior.w,
                    prior.h,
                    frame.w,
                    frame.h
                );
            }
        }

        let outcome = labeling::label_components(
            &self.mask,
            &mut self.labels,
            &mut self.stack,
            self.params.min_area,
            self.params.max_area,
        );
        self.stats = SegmentationStats {
            foreground_px: self.mask.count(),
            components: outcome.components,
            rejected_area: outcome.rejected_area,
            skipped_numeric: outcome.skipped_numeric,
        };
        log::debug!(
            "segmentation: {} components, {} in area band, {} numeric skips",
            outcome.components,
            outcome.blobs.len(),
            outcome.skipped_numeric
        );
        outcome.blobs
    }

    /// Component labels from the most recent `segment` call.
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Cleaned foreground mask from the most recent `segment` call.
    pub fn foreground(&self) -> &Mask {
        &self.mask
    }

    /// Counters from the most recent `segment` call.
    pub fn stats(&self) -> &SegmentationStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::GrayFrame;

    fn frame_with_dark_disk(w: usize, h: usize, cx: f32, cy: f32, r: f32) -> GrayFrame {
        let mut frame = GrayFrame::filled(w, h, 200);
        for y in 0..h {
            for x in 0..w {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if (dx * dx + dy * dy).sqrt() <= r {
                    frame.set(x, y, 30);
                }
            }
        }
        frame
    }

    #[test]
    fn empty_frame_yields_no_blobs() {
        let frame = GrayFrame::filled(64, 64, 180);
        let mut segmenter = FrameSegmenter::new(SegmenterParams::default());
        let blobs = segmenter.segment(&frame.as_view());
        assert!(blobs.is_empty());
        assert_eq!(segmenter.stats().components, 0);
    }

    #[test]
    fn dark_disk_is_segmented_once() {
        let frame = frame_with_dark_disk(96, 96, 48.0, 48.0, 16.0);
        let params = SegmenterParams {
            min_area: 200,
            ..SegmenterParams::default()
        };
        let mut segmenter = FrameSegmenter::new(params);
        let blobs = segmenter.segment(&frame.as_view());
        assert_eq!(blobs.len(), 1);
        let blob = &blobs[0];
        assert!((blob.centroid[0] - 48.0).abs() < 1.5);
        assert!((blob.centroid[1] - 48.0).abs() < 1.5);
        assert!(blob.axis_ratio() < 1.1);
        assert!(blob.solidity > 0.9);
        // Label map agrees with the blob at its centroid.
        assert_eq!(segmenter.labels().get(48, 48), blob.label);
    }

    #[test]
    fn segmentation_is_deterministic() {
        let frame = frame_with_dark_disk(96, 96, 40.0, 52.0, 14.0);
        let params = SegmenterParams {
            min_area: 200,
            ..SegmenterParams::default()
        };
        let mut segmenter = FrameSegmenter::new(params);
        let first = segmenter.segment(&frame.as_view());
        let second = segmenter.segment(&frame.as_view());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.area, b.area);
            assert_eq!(a.centroid, b.centroid);
            assert_eq!(a.bbox, b.bbox);
        }
    }

    #[test]
    fn prior_mask_suppresses_blobs() {
        let frame = frame_with_dark_disk(96, 96, 48.0, 48.0, 16.0);
        let params = SegmenterParams {
            min_area: 200,
            ..SegmenterParams::default()
        };
        let mut segmenter = FrameSegmenter::new(params);
        let empty_prior = Mask::new(96, 96);
        let blobs = segmenter.segment_with_prior(&frame.as_view(), Some(&empty_prior));
        assert!(blobs.is_empty());
    }
}
