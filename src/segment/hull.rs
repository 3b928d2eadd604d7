//! Convex hull (Andrew monotone chain) and polygon area for solidity.

/// Convex hull of a point set, counter-clockwise, no repeated endpoint.
/// Input order is destroyed. Collinear inputs yield a 2-point "hull".
pub(crate) fn convex_hull(points: &mut Vec<[f32; 2]>) -> Vec<[f32; 2]> {
    let n = points.len();
    if n < 3 {
        return points.clone();
    }
    points.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    points.dedup();

    let mut hull: Vec<[f32; 2]> = Vec::with_capacity(points.len() + 1);
    for &p in points.iter() {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev() {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Shoelace area of a simple polygon; orientation-independent.
pub(crate) fn polygon_area(polygon: &[[f32; 2]]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for i in 0..polygon.len() {
        let [x0, y0] = polygon[i];
        let [x1, y1] = polygon[(i + 1) % polygon.len()];
        twice_area += x0 as f64 * y1 as f64 - x1 as f64 * y0 as f64;
    }
    (twice_area.abs() * 0.5) as f32
}

#[inline]
fn cross(o: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}
