//! Binary morphology with a disk structuring element.
//!
//! Opening removes thresholding speckle smaller than the disk; closing fills
//! pinholes inside blob bodies. Pixels outside the frame count as background,
//! so erosion shaves regions touching the border.

use crate::frame::Mask;

/// Disk structuring element as precomputed center offsets.
#[derive(Clone, Debug)]
pub(crate) struct DiskKernel {
    pub radius: usize,
    offsets: Vec<(i32, i32)>,
}

impl DiskKernel {
    pub(crate) fn new(radius: usize) -> Self {
        let r = radius as i32;
        let r2 = r * r;
        let mut offsets = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    offsets.push((dx, dy));
                }
            }
        }
        Self { radius, offsets }
    }
}

/// Keep only foreground pixels whose entire disk neighborhood is foreground.
pub(crate) fn erode(src: &Mask, kernel: &DiskKernel, dst: &mut Mask) {
    resize_like(dst, src);
    let w = src.w as i32;
    let h = src.h as i32;
    for y in 0..src.h {
        for x in 0..src.w {
            if !src.get(x, y) {
                continue;
            }
            let mut keep = true;
            for &(dx, dy) in &kernel.offsets {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    keep = false;
                    break;
                }
                if !src.get(nx as usize, ny as usize) {
                    keep = false;
                    break;
                }
            }
            if keep {
                dst.set(x, y, true);
            }
        }
    }
}

/// Stamp the disk onto every foreground pixel.
pub(crate) fn dilate(src: &Mask, kernel: &DiskKernel, dst: &mut Mask) {
    resize_like(dst, src);
    let w = src.w as i32;
    let h = src.h as i32;
    for y in 0..src.h {
        for x in 0..src.w {
            if !src.get(x, y) {
                continue;
            }
            for &(dx, dy) in &kernel.offsets {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                dst.set(nx as usize, ny as usize, true);
            }
        }
    }
}

/// Erosion followed by dilation, in place via a scratch mask.
pub(crate) fn open(mask: &mut Mask, scratch: &mut Mask, kernel: &DiskKernel) {
    if kernel.radius == 0 {
        return;
    }
    erode(mask, kernel, scratch);
    dilate(scratch, kernel, mask);
}

/// Dilation followed by erosion, in place via a scratch mask.
pub(crate) fn close(mask: &mut Mask, scratch: &mut Mask, kernel: &DiskKernel) {
    if kernel.radius == 0 {
        return;
    }
    dilate(mask, kernel, scratch);
    erode(scratch, kernel, mask);
}

fn resize_like(dst: &mut Mask, src: &Mask) {
    dst.w = src.w;
    dst.h = src.h;
    dst.data.clear();
    dst.data.resize(src.w * src.h, 0);
}
