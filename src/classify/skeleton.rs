//! Zhang-Suen thinning and skeleton topology helpers.
//!
//! The classifier uses skeletons twice: branch points of the blob skeleton
//! feed the conformity gate, and the skeleton of the *inverted* blob mask
//! yields the cavity medial axis that encodes heading.

use crate::frame::Mask;

/// Clockwise 8-neighborhood starting north, the order the transition count
/// and the thinning conditions index into.
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

#[inline]
fn at(mask: &Mask, x: i32, y: i32) -> bool {
    if x < 0 || y < 0 || x >= mask.w as i32 || y >= mask.h as i32 {
        return false;
    }
    mask.get(x as usize, y as usize)
}

#[inline]
fn ring_at(mask: &Mask, x: usize, y: usize) -> [bool; 8] {
    let mut ring = [false; 8];
    for (i, (dx, dy)) in RING.iter().enumerate() {
        ring[i] = at(mask, x as i32 + dx, y as i32 + dy);
    }
    ring
}

/// Number of 0 -> 1 transitions walking the 8-neighborhood circularly.
/// Equals the number of distinct skeleton arcs meeting at the pixel.
pub(crate) fn neighbor_transitions(mask: &Mask, x: usize, y: usize) -> u32 {
    let ring = ring_at(mask, x, y);
    let mut transitions = 0u32;
    for i in 0..8 {
        if !ring[i] && ring[(i + 1) % 8] {
            transitions += 1;
        }
    }
    transitions
}

/// Thin the mask to a one-pixel-wide skeleton, in place (Zhang-Suen).
pub(crate) fn skeletonize(mask: &mut Mask) {
    let mut to_clear: Vec<(usize, usize)> = Vec::new();
    loop {
        let mut changed = false;
        for pass in 0..2 {
            to_clear.clear();
            for y in 0..mask.h {
                for x in 0..mask.w {
                    if !mask.get(x, y) {
                        continue;
                    }
                    let ring = ring_at(mask, x, y);
                    let neighbors = ring.iter().filter(|&&v| v).count();
                    if !(2..=6).contains(&neighbors) {
                        continue;
                    }
                    let mut transitions = 0u32;
                    for i in 0..8 {
                        if !ring[i] && ring[(i + 1) % 8] {
                            transitions += 1;
                        }
                    }
                    if transitions != 1 {
                        continue;
                    }
                    // ring: 0 = N, 2 = E, 4 = S, 6 = W
                    let (cond_a, cond_b) = if pass == 0 {
                        (
                            !(ring[0] && ring[2] && ring[4]),
                            !(ring[2] && ring[4] && ring[6]),
                        )
                    } else {
                        (
                            !(ring[0] && ring[2] && ring[6]),
                            !(ring[0] && ring[4] && ring[6]),
                        )
                    };
                    if cond_a && cond_b {
                        to_clear.push((x, y));
                    }
                }
            }
            if !to_clear.is_empty() {
                changed = true;
                for &(x, y) in &to_clear {
                    mask.set(x, y, false);
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// Count skeleton pixels where three or more arcs meet.
pub(crate) fn branch_point_count(skel: &Mask) -> u32 {
    let mut count = 0u32;
    for y in 0..skel.h {
        for x in 0..skel.w {
            if skel.get(x, y) && neighbor_transitions(skel, x, y) >= 3 {
                count += 1;
            }
        }
    }
    count
}

/// 8-connected skeleton fragments as pixel lists.
pub(crate) fn fragments(skel: &Mask) -> Vec<Vec<(usize, usize)>> {
    let mut visited = vec![false; skel.w * skel.h];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut out = Vec::new();
    for y in 0..skel.h {
        for x in 0..skel.w {
            if !skel.get(x, y) || visited[y * skel.w + x] {
                continue;
            }
            let mut fragment = Vec::new();
            visited[y * skel.w + x] = true;
            stack.push((x, y));
            while let Some((px, py)) = stack.pop() {
                fragment.push((px, py));
                for (dx, dy) in RING {
                    let nx = px as i32 + dx;
                    let ny = py as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= skel.w as i32 || ny >= skel.h as i32 {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if skel.get(nx, ny) && !visited[ny * skel.w + nx] {
                        visited[ny * skel.w + nx] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            out.push(fragment);
        }
    }
    out
}

/// Largest skeleton fragment that stays clear of the outer border band.
/// Fragments touching the band are mask-boundary artifacts, not structure.
pub(crate) fn largest_interior_fragment(
    skel: &Mask,
    band: usize,
) -> Option<Vec<(usize, usize)>> {
    let near_border = |&(x, y): &(usize, usize)| {
        x < band || y < band || x + band >= skel.w || y + band >= skel.h
    };
    fragments(skel)
        .into_iter()
        .filter(|frag| !frag.iter().any(near_border))
        .max_by_key(|frag| frag.len())
}
