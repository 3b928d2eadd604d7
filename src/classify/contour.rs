//! Moore-neighbor boundary tracing.

use crate::frame::Mask;

const RING: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Trace the outer boundary of the first foreground component in raster
/// order. Points come back in walk order; an empty mask yields an empty
/// contour and an isolated pixel yields just itself.
pub(crate) fn trace_boundary(mask: &Mask) -> Vec<[f32; 2]> {
    let mut start = None;
    'scan: for y in 0..mask.h {
        for x in 0..mask.w {
            if mask.get(x, y) {
                start = Some((x as i32, y as i32));
                break 'scan;
            }
        }
    }
    let Some(start) = start else {
        return Vec::new();
    };

    let fg = |p: (i32, i32)| {
        p.0 >= 0
            && p.1 >= 0
            && p.0 < mask.w as i32
            && p.1 < mask.h as i32
            && mask.get(p.0 as usize, p.1 as usize)
    };

    // The raster-first pixel has background to its west; enter from there.
    let start_backtrack = (start.0 - 1, start.1);
    let mut contour = vec![[start.0 as f32, start.1 as f32]];
    let mut current = start;
    let mut backtrack = start_backtrack;
    // Jacob's criterion plus a hard cap for open chains.
    let limit = 4 * mask.w * mask.h + 8;

    for _ in 0..limit {
        let bi = RING
            .iter()
            .position(|&(dx, dy)| (current.0 + dx, current.1 + dy) == backtrack)
            .unwrap_or(6);
        let mut next = None;
        let mut prev = backtrack;
        for k in 1..=8 {
            let idx = (bi + k) % 8;
            let cand = (current.0 + RING[idx].0, current.1 + RING[idx].1);
            if fg(cand) {
                next = Some((cand, prev));
                break;
            }
            prev = cand;
        }
        let Some((next, next_backtrack)) = next else {
            break;
        };
        if next == start && next_backtrack == start_backtrack {
            break;
        }
        contour.push([next.0 as f32, next.1 as f32]);
        current = next;
        backtrack = next_backtrack;
    }

    contour
}
