//! Rendered walker fixtures shared by the scenario tests.

use microtrack::frame::GrayFrame;
use microtrack::synthetic::{render_frame, TargetSpec};

pub const BACKGROUND: u8 = 230;
pub const FOREGROUND: u8 = 20;

/// One walker centered at (50, 50) on a 100x100 field.
pub fn single_target_frame(heading: f32) -> GrayFrame {
    let target = TargetSpec {
        center: [50.0, 50.0],
        heading,
        ..TargetSpec::default()
    };
    render_frame(100, 100, BACKGROUND, FOREGROUND, &[target])
}

/// Uniform bright field with nothing to detect.
pub fn empty_frame(width: usize, height: usize) -> GrayFrame {
    render_frame(width, height, BACKGROUND, FOREGROUND, &[])
}

/// Arbitrary walkers on a custom field.
pub fn frame_with_targets(width: usize, height: usize, targets: &[TargetSpec]) -> GrayFrame {
    render_frame(width, height, BACKGROUND, FOREGROUND, targets)
}
