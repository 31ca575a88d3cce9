//! Toolpath optimizer (C9): greedy nearest-neighbor path ordering plus
//! redundant-point and collinear-point removal.

use millwright_core::geom::{Path2D, Point2D};

/// Reorder a set of disjoint paths by always jumping to whichever
/// remaining path starts closest to the current position — a greedy
/// nearest-neighbor tour, not a globally optimal one, but cheap and good
/// enough to cut rapid-travel time meaningfully on real jobs.
pub fn order_paths(paths: Vec<Path2D>, start: Point2D) -> Vec<Path2D> {
    let mut remaining = paths;
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut cursor = start;

    while !remaining.is_empty() {
        let (best_idx, _) = remaining
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let d = p
                    .points()
                    .first()
                    .map(|first| cursor.distance_to(first))
                    .unwrap_or(f64::INFINITY);
                (i, d)
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .expect("remaining is non-empty");

        let chosen = remaining.remove(best_idx);
        if let Some(last) = chosen.points().last() {
            cursor = *last;
        }
        ordered.push(chosen);
    }
    ordered
}

/// Drop consecutive points closer together than `min_distance` (1e-6mm
/// per spec), keeping the first of each cluster.
pub fn remove_redundant_points(path: &Path2D, min_distance: f64) -> Path2D {
    let points = path.points();
    if points.len() < 2 {
        return path.clone();
    }
    let mut out = vec![points[0]];
    for &p in &points[1..] {
        if out.last().unwrap().distance_to(&p) > min_distance {
            out.push(p);
        }
    }
    Path2D::from_points(out)
}

/// Drop a middle point `b` of three consecutive points `a, b, c` when the
/// triangle they form has an area below `tolerance` — i.e. `b` lies
/// effectively on the line `a-c`.
pub fn remove_collinear_points(path: &Path2D, tolerance: f64) -> Path2D {
    let points = path.points();
    if points.len() < 3 {
        return path.clone();
    }
    let mut out = vec![points[0]];
    for i in 1..points.len() - 1 {
        let a = *out.last().unwrap();
        let b = points[i];
        let c = points[i + 1];
        if triangle_area(a, b, c) > tolerance {
            out.push(b);
        }
    }
    out.push(*points.last().unwrap());
    Path2D::from_points(out)
}

fn triangle_area(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    ((b - a).cross(&(c - a))).abs() / 2.0
}

/// Run both cleanup passes in sequence, as the optimizer does before
/// ordering (cheaper to clean each path once than to re-clean after
/// reordering, since reordering doesn't change a path's own points).
pub fn clean_path(path: &Path2D, min_distance: f64, linearize_tolerance: f64) -> Path2D {
    let deduped = remove_redundant_points(path, min_distance);
    remove_collinear_points(&deduped, linearize_tolerance)
}
