//! Polygon boolean engine (C5): union/intersect/difference/offset over
//! `cavalier_contours` polylines, with coordinates quantized to 0.001mm
//! fixed-point precision before every operation — mirroring the integer
//! scaling Clipper2 uses in the original implementation, so that
//! near-coincident edges produced by upstream floating point sampling
//! join cleanly instead of leaving sliver gaps.

use crate::error::{GeometryError, Result};
use cavalier_contours::polyline::{
    BooleanOp as CCBooleanOp, PlineSource, PlineSourceMut, PlineVertex, Polyline,
};
use millwright_core::geom::{Point2D, Polygon2D};

/// Coordinates are rounded to the nearest 1/1000 mm before any boolean or
/// offset operation; `SCALE` is the reciprocal of that precision.
const SCALE: f64 = 1000.0;

fn to_fixed(v: f64) -> f64 {
    (v * SCALE).round() / SCALE
}

/// `parallel_offset`'s sign is relative to the polyline's own winding, not
/// absolute, so every polygon is forced to the same canonical
/// (counter-clockwise) orientation before being handed to
/// `cavalier_contours` — mirroring `gcodekit5-designer::pocket_operations`'s
/// `prepare_polygon`, which forces a fixed winding for the same reason
/// before every offset call. This is what makes `offset_polygon`'s sign
/// absolute: positive always grows outward, negative always shrinks inward,
/// regardless of the winding the caller's polygon happened to arrive in.
fn polygon_to_polyline(polygon: &Polygon2D) -> Polyline<f64> {
    let mut pline = Polyline::new();
    pline.set_is_closed(true);
    let points = polygon.points();
    let normalized: Vec<Point2D> = if polygon.is_clockwise() {
        points.iter().rev().copied().collect()
    } else {
        points.to_vec()
    };
    for p in &normalized {
        pline.add(to_fixed(p.x), to_fixed(p.y), 0.0);
    }
    pline
}

fn polyline_to_polygon(pline: &Polyline<f64>) -> Polygon2D {
    let points: Vec<Point2D> = pline
        .iter_vertexes()
        .map(|v: PlineVertex<f64>| Point2D::new(v.x, v.y))
        .collect();
    Polygon2D::from_points(points)
}

/// Which boolean operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersect,
    Difference,
}

impl From<BooleanOp> for CCBooleanOp {
    fn from(op: BooleanOp) -> Self {
        match op {
            BooleanOp::Union => CCBooleanOp::Or,
            BooleanOp::Intersect => CCBooleanOp::And,
            BooleanOp::Difference => CCBooleanOp::Not,
        }
    }
}

/// Run a boolean operation between two polygons, returning every resulting
/// polygon (a boolean op can split a shape into multiple disjoint rings).
pub fn boolean_op(subject: &Polygon2D, clip: &Polygon2D, op: BooleanOp) -> Result<Vec<Polygon2D>> {
    if subject.is_empty() || clip.is_empty() {
        return Err(GeometryError::InvalidPolygon.into());
    }
    let a = polygon_to_polyline(subject);
    let b = polygon_to_polyline(clip);
    let result = a.boolean(&b, op.into());

    let mut polygons: Vec<Polygon2D> = result
        .pos_plines
        .iter()
        .map(|r| polyline_to_polygon(&r.pline))
        .chain(result.neg_plines.iter().map(|r| polyline_to_polygon(&r.pline)))
        .filter(|p| !p.is_empty())
        .collect();

    if polygons.is_empty() {
        return Err(GeometryError::EmptyBooleanResult.into());
    }
    polygons.retain(|p| p.area() > 1e-9);
    if polygons.is_empty() {
        return Err(GeometryError::EmptyBooleanResult.into());
    }
    Ok(polygons)
}

/// Offset a closed polygon by `distance` (positive grows outward, negative
/// shrinks inward under the source's right-hand winding convention). May
/// split into multiple rings when the offset crosses itself.
pub fn offset_polygon(polygon: &Polygon2D, distance: f64) -> Result<Vec<Polygon2D>> {
    if polygon.is_empty() {
        return Err(GeometryError::InvalidPolygon.into());
    }
    let pline = polygon_to_polyline(polygon);
    let offset = to_fixed(distance);
    let results = pline.parallel_offset(offset);
    let polygons: Vec<Polygon2D> = results
        .iter()
        .map(polyline_to_polygon)
        .filter(|p| !p.is_empty())
        .collect();
    if polygons.is_empty() {
        return Err(GeometryError::EmptyBooleanResult.into());
    }
    Ok(polygons)
}

/// Build the nested solid/hole forest of a flat set of polygons by
/// repeated pairwise containment offsetting — thin wrapper used by the
/// hierarchy builder (C6), kept here because it is a boolean-engine
/// primitive (inset-by-zero containment test).
pub fn polygon_contains(outer: &Polygon2D, inner: &Polygon2D) -> bool {
    inner
        .points()
        .first()
        .map(|p| outer.contains_point(*p))
        .unwrap_or(false)
}
