//! Synthetic micro-robot targets for demos and tests.
//!
//! Renders the canonical lab target: a dark disk with radial legs and a
//! hollow interior pocket sitting behind the centroid along the heading
//! axis. The shape passes every conformity gate (near-unit axis ratio,
//! mid-band solidity, hollow center, one skeleton branch per leg) and the
//! pocket encodes the heading, so rendered frames exercise the whole
//! pipeline end to end.

use crate::frame::GrayFrame;

/// Geometry of one rendered target.
#[derive(Clone, Copy, Debug)]
pub struct TargetSpec {
    /// Body center in frame pixels.
    pub center: [f32; 2],
    /// Heading in radians, +x axis zero, +y down.
    pub heading: f32,
    /// Radius of the solid body disk.
    pub ring_radius: f32,
    /// How far each leg extends beyond the body.
    pub leg_len: f32,
    pub leg_width: f32,
    /// Number of radial legs.
    pub arms: usize,
    /// Semi-axes of the interior pocket, along and across the heading.
    pub cavity_axes: [f32; 2],
    /// Pocket center offset behind the body center, along the heading axis.
    pub cavity_offset: f32,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            heading: 0.0,
            ring_radius: 20.0,
            leg_len: 12.0,
            leg_width: 3.0,
            arms: 5,
            cavity_axes: [8.0, 3.0],
            cavity_offset: 4.0,
        }
    }
}

impl TargetSpec {
    /// Whether the target covers the pixel at `(x, y)`.
    fn covers(&self, x: f32, y: f32) -> bool {
        let dx = x - self.center[0];
        let dy = y - self.center[1];
        let (sin_h, cos_h) = self.heading.sin_cos();
        let along = dx * cos_h + dy * sin_h;
        let across = -dx * sin_h + dy * cos_h;

        // The pocket punches through body and legs alike, so it stays an
        // enclosed background region the skeleton axis fit can find.
        let u = (along + self.cavity_offset) / self.cavity_axes[0].max(1e-3);
        let v = across / self.cavity_axes[1].max(1e-3);
        if u * u + v * v <= 1.0 {
            return false;
        }

        if dx * dx + dy * dy <= self.ring_radius * self.ring_radius {
            return true;
        }

        let reach = self.ring_radius + self.leg_len;
        let step = std::f32::consts::TAU / self.arms.max(1) as f32;
        for k in 0..self.arms {
            let phi = self.heading + k as f32 * step;
            let (sin_p, cos_p) = phi.sin_cos();
            let a = dx * cos_p + dy * sin_p;
            let b = -dx * sin_p + dy * cos_p;
            if a >= 0.0 && a <= reach && b.abs() <= self.leg_width * 0.5 {
                return true;
            }
        }
        false
    }
}

/// Stamp a target onto a frame with the given pixel value.
pub fn draw_target(frame: &mut GrayFrame, target: &TargetSpec, value: u8) {
    let reach = target.ring_radius + target.leg_len + 1.0;
    let x0 = (target.center[0] - reach).floor().max(0.0) as usize;
    let y0 = (target.center[1] - reach).floor().max(0.0) as usize;
    let x1 = ((target.center[0] + reach).ceil() as usize + 1).min(frame.width());
    let y1 = ((target.center[1] + reach).ceil() as usize + 1).min(frame.height());
    for y in y0..y1 {
        for x in x0..x1 {
            if target.covers(x as f32, y as f32) {
                frame.set(x, y, value);
            }
        }
    }
}

/// Render dark targets on a bright background.
pub fn render_frame(
    width: usize,
    height: usize,
    background: u8,
    foreground: u8,
    targets: &[TargetSpec],
) -> GrayFrame {
    let mut frame = GrayFrame::filled(width, height, background);
    for target in targets {
        draw_target(&mut frame, target, foreground);
    }
    frame
}
