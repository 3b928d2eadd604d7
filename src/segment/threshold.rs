//! Gamma correction and locally adaptive thresholding.
//!
//! Microscope illumination is uneven across the field of view, so a single
//! global threshold either loses blobs near the bright center or merges the
//! dim periphery into one region. The local mean over a square window,
//! computed via an integral image, adapts per pixel in O(1).

use crate::frame::{FrameU8, Mask};

/// Precompute the 8-bit gamma transfer curve. `gamma == 1.0` is identity.
pub(crate) fn gamma_lut(gamma: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if (gamma - 1.0).abs() < 1e-6 {
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        return lut;
    }
    let inv = 1.0 / 255.0f32;
    for (i, v) in lut.iter_mut().enumerate() {
        let mapped = (i as f32 * inv).powf(gamma) * 255.0;
        *v = mapped.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply the gamma curve to a frame view, writing a contiguous buffer.
pub(crate) fn apply_gamma(frame: &FrameU8<'_>, lut: &[u8; 256], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(frame.w * frame.h);
    for y in 0..frame.h {
        out.extend(frame.row(y).iter().map(|&v| lut[v as usize]));
    }
}

/// Summed-area table over an 8-bit buffer, `(w + 1) x (h + 1)` with a zero
/// top/left border so window sums need no boundary branches.
pub(crate) struct IntegralImage {
    w: usize,
    h: usize,
    sums: Vec<u64>,
}

impl IntegralImage {
    pub(crate) fn new() -> Self {
        Self {
            w: 0,
            h: 0,
            sums: Vec::new(),
        }
    }

    pub(crate) fn rebuild(&mut self, gray: &[u8], w: usize, h: usize) {
        debug_assert_eq!(gray.len(), w * h);
        self.w = w;
        self.h = h;
        let stride = w + 1;
        self.sums.clear();
        self.sums.resize(stride * (h + 1), 0);
        for y in 0..h {
            let mut row_sum = 0u64;
            let src = &gray[y * w..(y + 1) * w];
            let (above, current) = self.sums.split_at_mut((y + 1) * stride);
            let above = &above[y * stride..];
            for x in 0..w {
                row_sum += src[x] as u64;
                current[x + 1] = above[x + 1] + row_sum;
            }
        }
    }

    /// Mean intensity over the clamped window `[x - r, x + r] x [y - r, y + r]`.
    #[inline]
    pub(crate) fn window_mean(&self, x: usize, y: usize, radius: usize) -> f32 {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius + 1).min(self.w);
        let y1 = (y + radius + 1).min(self.h);
        let stride = self.w + 1;
        let sum = self.sums[y1 * stride + x1] + self.sums[y0 * stride + x0]
            - self.sums[y0 * stride + x1]
            - self.sums[y1 * stride + x0];
        let count = ((x1 - x0) * (y1 - y0)) as f32;
        sum as f32 / count
    }
}

/// Threshold against the local mean. With `dark_objects` set, foreground is
/// every pixel darker than `mean - offset`; otherwise brighter than
/// `mean + offset`.
pub(crate) fn adaptive_threshold(
    gray: &[u8],
    w: usize,
    h: usize,
    radius: usize,
    offset: f32,
    dark_objects: bool,
    integral: &mut IntegralImage,
    out: &mut Mask,
) {
    integral.rebuild(gray, w, h);
    out.w = w;
    out.h = h;
    out.data.clear();
    out.data.resize(w * h, 0);
    for y in 0..h {
        for x in 0..w {
            let mean = integral.window_mean(x, y, radius);
            let v = gray[y * w + x] as f32;
            let fg = if dark_objects {
                v < mean - offset
            } else {
                v > mean + offset
            };
            if fg {
                out.data[y * w + x] = 255;
            }
        }
    }
}
