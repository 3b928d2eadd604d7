//! Frame buffers and masks shared by the detection pipeline.
//!
//! - [`FrameU8`]: borrowed grayscale view with stride, the input to every stage.
//! - [`GrayFrame`]: owned grayscale buffer, what the camera and loaders hand out.
//! - [`Mask`]: owned binary image (0 background, 255 foreground).
//! - [`LabelMap`]: connected-component labels, 0 meaning background.

/// Borrowed 8-bit grayscale frame view.
#[derive(Clone, Debug)]
pub struct FrameU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> FrameU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

/// Owned 8-bit grayscale frame with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayFrame {
    /// Construct an owned frame from raw row-major bytes.
    ///
    /// `data.len()` must equal `width * height`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), width * height, "frame buffer size mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    /// A frame filled with a constant intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self::new(width, height, vec![value; width * height])
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.width + x] = value;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Borrow as a read-only `FrameU8` view
    pub fn as_view(&self) -> FrameU8<'_> {
        FrameU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

/// Binary image, 255 for foreground and 0 for background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl Mask {
    /// All-background mask of the given size.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0u8; w * h],
        }
    }

    pub fn from_data(w: usize, h: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), w * h, "mask buffer size mismatch");
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.w + x] = if on { 255 } else { 0 };
    }

    /// Reset every pixel to background.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Merge another mask of the same size into this one.
    pub fn union_with(&mut self, other: &Mask) {
        debug_assert_eq!(self.w, other.w);
        debug_assert_eq!(self.h, other.h);
        for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
            if src != 0 {
                *dst = 255;
            }
        }
    }

    /// Keep only pixels set in both masks.
    pub fn intersect_with(&mut self, other: &Mask) {
        debug_assert_eq!(self.w, other.w);
        debug_assert_eq!(self.h, other.h);
        for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
            if src == 0 {
                *dst = 0;
            }
        }
    }
}

/// Connected-component labels over a frame, 0 meaning background.
#[derive(Clone, Debug)]
pub struct LabelMap {
    pub w: usize,
    pub h: usize,
    pub labels: Vec<u32>,
}

impl LabelMap {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            labels: vec![0u32; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.labels[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, label: u32) {
        self.labels[y * self.w + x] = label;
    }

    /// Resize and reset for a new frame.
    pub fn reset(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.labels.clear();
        self.labels.resize(w * h, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_respects_stride() {
        let data = vec![0u8, 1, 2, 10, 11, 12];
        let view = FrameU8 {
            w: 2,
            h: 2,
            stride: 3,
            data: &data,
        };
        assert_eq!(view.get(1, 0), 1);
        assert_eq!(view.get(0, 1), 10);
        assert_eq!(view.row(1), &[10, 11]);
    }

    #[test]
    fn mask_union_and_count() {
        let mut a = Mask::new(4, 1);
        let mut b = Mask::new(4, 1);
        a.set(0, 0, true);
        b.set(2, 0, true);
        a.union_with(&b);
        assert_eq!(a.count(), 2);
        assert!(a.get(0, 0));
        assert!(a.get(2, 0));
        assert!(!a.get(1, 0));
    }
}
