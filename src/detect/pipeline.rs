//! Detection pass driving segmentation, classification and overlay building.
//!
//! The [`ObjectExtractor`] exposes a simple API: feed a grayscale frame and
//! get back the accepted robots, a display overlay mask, and a per-stage
//! trace. Internally it coordinates the segmenter, the per-blob conformity
//! gate, the optional foreground predictor, and the overlay dilation.
//!
//! Typical usage:
//! ```no_run
//! use microtrack::detect::{ExtractorParams, ObjectExtractor};
//! use microtrack::frame::FrameU8;
//!
//! # fn example(frame: FrameU8) {
//! let mut extractor = ObjectExtractor::new(ExtractorParams::default());
//! let result = extractor.extract(&frame);
//! for det in &result.detections {
//!     println!("robot at ({:.1}, {:.1})", det.center.x, det.center.y);
//! }
//! # }
//! ```
use super::params::ExtractorParams;
use super::MaskPredictor;
use crate::classify::{self, BlobCrop, RejectReason, ShapeClassifier, ShapeReport};
use crate::coords::CameraPoint;
use crate::diagnostics::{
    elapsed_ms, ClassificationStage, FrameTrace, InputDescriptor, OverlayStage, TimingBreakdown,
};
use crate::frame::{FrameU8, LabelMap, Mask};
use crate::segment::{dilate, DiskKernel, FrameSegmenter};
use crate::types::{Blob, Detection, ShapeDescriptor};
use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::Instant;

/// Output of one detection pass.
#[derive(Clone, Debug)]
pub struct FrameDetections {
    /// Robots that passed every gate, in blob-label order.
    pub detections: Vec<Detection>,
    /// Union of accepted blob masks, dilated for display.
    pub overlay: Mask,
    /// Per-stage diagnostics for this pass.
    pub trace: FrameTrace,
}

/// Detection orchestrator; owns the per-frame scratch buffers.
pub struct ObjectExtractor {
    params: ExtractorParams,
    segmenter: FrameSegmenter,
    classifier: ShapeClassifier,
    predictor: Option<Box<dyn MaskPredictor>>,
    overlay_kernel: DiskKernel,
    union: Mask,
}

impl ObjectExtractor {
    /// Create an extractor with the supplied parameters.
    pub fn new(params: ExtractorParams) -> Self {
        let segmenter = FrameSegmenter::new(params.segmenter.clone());
        let classifier = ShapeClassifier::new(params.classifier.clone());
        let overlay_kernel = DiskKernel::new(params.overlay_dilate_px);
        Self {
            params,
            segmenter,
            classifier,
            predictor: None,
            overlay_kernel,
            union: Mask::new(0, 0),
        }
    }

    /// Attach or detach the optional foreground predictor.
    pub fn set_predictor(&mut self, predictor: Option<Box<dyn MaskPredictor>>) {
        self.predictor = predictor;
    }

    pub fn params(&self) -> &ExtractorParams {
        &self.params
    }

    /// Run one full detection pass over a grayscale frame.
    pub fn extract(&mut self, frame: &FrameU8<'_>) -> FrameDetections {
        debug!("ObjectExtractor::extract start w={} h={}", frame.w, frame.h);
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        // Predictor failures degrade to plain segmentation, never abort.
        let prior = match self.predictor.as_mut() {
            Some(predictor) => match predictor.predict(frame) {
                Ok(mask) => Some(mask),
                Err(err) => {
                    warn!("mask predictor failed: {err}; continuing without prior");
                    None
                }
            },
            None => None,
        };

        let seg_start = Instant::now();
        let blobs = self.segmenter.segment_with_prior(frame, prior.as_ref());
        timings.segmentation_ms = elapsed_ms(seg_start);

        let class_start = Instant::now();
        let labels = self.segmenter.labels();
        let classifier = &self.classifier;
        let pad = self.params.mask_pad_px;
        let evaluate = |blob: &Blob| -> (BlobCrop, Result<ShapeReport, RejectReason>) {
            let crop = crop_blob(labels, blob, pad);
            let verdict = classifier.classify_detailed(&crop, blob);
            (crop, verdict)
        };
        #[cfg(feature = "parallel")]
        let evaluated: Vec<_> = blobs.par_iter().map(evaluate).collect();
        #[cfg(not(feature = "parallel"))]
        let evaluated: Vec<_> = blobs.iter().map(evaluate).collect();

        let mut classification = ClassificationStage {
            evaluated: blobs.len() as u32,
            ..ClassificationStage::default()
        };
        let mut detections = Vec::new();
        self.union.w = frame.w;
        self.union.h = frame.h;
        self.union.data.clear();
        self.union.data.resize(frame.w * frame.h, 0);

        for (blob, (crop, verdict)) in blobs.iter().zip(evaluated) {
            let report = match verdict {
                Ok(report) => report,
                Err(reason) => {
                    classification.rejections.record(reason);
                    continue;
                }
            };
            let Some(hu) = classify::hu_invariants(&crop.mask) else {
                classification.rejections.record(RejectReason::DegenerateAxis);
                continue;
            };
            let mut contour = classify::trace_boundary(&crop.mask);
            for p in &mut contour {
                p[0] += crop.origin.0 as f32;
                p[1] += crop.origin.1 as f32;
            }
            stamp_crop(&mut self.union, &crop);

            let half_extent = blob.bbox.width().max(blob.bbox.height()) as f32 * 0.5;
            detections.push(Detection {
                center: CameraPoint::new(blob.centroid[0], blob.centroid[1]),
                radius: half_extent + self.params.radius_margin_px as f32,
                orientation: report.orientation,
                shape: ShapeDescriptor { hu, contour },
            });
        }
        classification.accepted = detections.len() as u32;
        timings.classification_ms = elapsed_ms(class_start);

        let overlay_start = Instant::now();
        let mut overlay = Mask::new(0, 0);
        dilate(&self.union, &self.overlay_kernel, &mut overlay);
        let overlay_stage = OverlayStage {
            dilate_px: self.params.overlay_dilate_px,
            foreground_px: overlay.count(),
        };
        timings.overlay_ms = elapsed_ms(overlay_start);

        timings.total_ms = elapsed_ms(total_start);
        debug!(
            "ObjectExtractor::extract done: {} blobs, {} accepted, {:.2} ms",
            classification.evaluated, classification.accepted, timings.total_ms
        );
        FrameDetections {
            detections,
            overlay,
            trace: FrameTrace {
                input: InputDescriptor {
                    width: frame.w,
                    height: frame.h,
                },
                timings,
                segmentation: self.segmenter.stats().clone(),
                classification,
                overlay: overlay_stage,
            },
        }
    }
}

/// Copy one blob's pixels into a padded crop mask.
fn crop_blob(labels: &LabelMap, blob: &Blob, pad: usize) -> BlobCrop {
    let rect = blob.bbox.padded(pad, labels.w, labels.h);
    let mut mask = Mask::new(rect.width(), rect.height());
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            if labels.get(x, y) == blob.label {
                mask.set(x - rect.x0, y - rect.y0, true);
            }
        }
    }
    BlobCrop {
        mask,
        origin: (rect.x0, rect.y0),
    }
}

fn stamp_crop(union: &mut Mask, crop: &BlobCrop) {
    for y in 0..crop.mask.h {
        for x in 0..crop.mask.w {
            if crop.mask.get(x, y) {
                union.set(x + crop.origin.0, y + crop.origin.1, true);
            }
        }
    }
}
