//! Area-clearing CAM strategies (C8): the tool-mode → toolpath mapping
//! (perimeter/punchout/pocket/engrave) plus the spiral, contour-parallel,
//! and parallel/raster clearing algorithms they're built from.
//!
//! Numeric thresholds (stop conditions, pass caps) mirror
//! `cam_processor.cpp`'s clearing loop exactly, since they're tuned
//! constants rather than derivable ones.

use millwright_core::geom::{Path2D, Point2D, Polygon2D};
use millwright_core::{CutoutMode, CutoutParams};

use crate::boolean_engine::offset_polygon;
use crate::error::{ResourceError, Result};

const MAX_SPIRAL_PASSES: u32 = 1000;
const MAX_CONTOUR_PASSES: u32 = 10;

/// One clearing pass: a closed loop to cut at the current tool diameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearingPass {
    pub polygon: Polygon2D,
}

/// Spiral inward (punchout: start at perimeter, spiral toward center and
/// stop once remaining area falls below the tool "footprint", `0.1 * d^2`)
/// or spiral outward (pocket: start inset by stepover, grow outward to the
/// original boundary).
pub fn spiral(
    boundary: &Polygon2D,
    tool_diameter: f64,
    params: &CutoutParams,
    inward: bool,
) -> Result<Vec<ClearingPass>> {
    let stepover = (params.stepover * tool_diameter).min(params.max_stepover);
    let stop_area = 0.1 * tool_diameter * tool_diameter;
    let mut passes = Vec::new();
    let mut current = boundary.clone();

    for i in 0..MAX_SPIRAL_PASSES {
        if inward && current.area() <= stop_area {
            break;
        }
        passes.push(ClearingPass {
            polygon: current.clone(),
        });
        let step = if inward { -stepover } else { stepover };
        match offset_polygon(&current, step) {
            Ok(mut rings) => {
                rings.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap());
                current = rings.remove(0);
            }
            Err(_) => break,
        }
        if !inward && current.area() >= boundary.area() {
            passes.push(ClearingPass { polygon: boundary.clone() });
            break;
        }
        if i == MAX_SPIRAL_PASSES - 1 {
            return Err(ResourceError::IterationCapExceeded {
                operation: "spiral".into(),
                cap: MAX_SPIRAL_PASSES,
            }
            .into());
        }
    }
    Ok(passes)
}

/// Contour-parallel clearing: successive insets of the boundary at
/// `stepover` spacing, stopping once a pass's area drops below
/// `2.0 * d^2` (not worth a dedicated pass) or convergence (successive
/// pass areas differ by less than 10%) is detected, capped at
/// `MAX_CONTOUR_PASSES`.
pub fn contour_parallel(boundary: &Polygon2D, tool_diameter: f64, params: &CutoutParams) -> Result<Vec<ClearingPass>> {
    let stepover = (params.stepover * tool_diameter).min(params.max_stepover);
    let min_pass_area = 2.0 * tool_diameter * tool_diameter;
    let mut passes = Vec::new();
    let mut current = boundary.clone();
    let mut previous_area = current.area();

    for i in 0..MAX_CONTOUR_PASSES {
        if current.area() < min_pass_area {
            break;
        }
        passes.push(ClearingPass {
            polygon: current.clone(),
        });
        let next = match offset_polygon(&current, -stepover) {
            Ok(mut rings) => {
                rings.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap());
                rings.remove(0)
            }
            Err(_) => break,
        };
        let convergence = (previous_area - next.area()).abs() / previous_area.max(1e-9);
        if convergence < 0.1 {
            break;
        }
        previous_area = next.area();
        current = next;
        if i == MAX_CONTOUR_PASSES - 1 {
            return Err(ResourceError::IterationCapExceeded {
                operation: "contour_parallel".into(),
                cap: MAX_CONTOUR_PASSES,
            }
            .into());
        }
    }
    Ok(passes)
}

/// Parallel/raster clearing at an angle: scanlines across the boundary's
/// bounding box, each clipped to the boundary by a midpoint-in-polygon
/// test. This is a deliberately approximate clip: a scanline whose
/// midpoint falls outside the polygon while both ends of the segment
/// happen to fall inside a concave lobe is dropped in full rather than
/// split, matching the limitation recorded in spec §9.
pub fn parallel_raster(boundary: &Polygon2D, tool_diameter: f64, params: &CutoutParams, angle_deg: f64) -> Vec<Path2D> {
    let stepover = (params.stepover * tool_diameter).min(params.max_stepover).max(1e-6);
    let Some(bounds) = boundary.bounds() else {
        return Vec::new();
    };
    let angle = angle_deg.to_radians();
    let (cos_a, sin_a) = (angle.cos(), angle.sin());
    let diagonal = bounds.diagonal().max(1.0);
    let center = bounds.center();
    let lines = (diagonal / stepover).ceil() as i64;

    let mut out = Vec::new();
    for k in -lines..=lines {
        let offset = k as f64 * stepover;
        // A scanline through `center + offset * perpendicular`, running
        // along direction (cos_a, sin_a) for `diagonal` in each direction.
        let perp = Point2D::new(-sin_a, cos_a);
        let origin = center + perp * offset;
        let a = origin - Point2D::new(cos_a, sin_a) * diagonal;
        let b = origin + Point2D::new(cos_a, sin_a) * diagonal;
        if let Some(clipped) = clip_scanline(a, b, boundary) {
            out.push(clipped);
        }
    }
    out
}

fn clip_scanline(a: Point2D, b: Point2D, boundary: &Polygon2D) -> Option<Path2D> {
    const STEPS: usize = 64;
    let mut inside_runs: Vec<(Point2D, Point2D)> = Vec::new();
    let mut run_start: Option<Point2D> = None;
    for i in 0..=STEPS {
        let t = i as f64 / STEPS as f64;
        let p = a + (b - a) * t;
        let midpoint_inside = boundary.contains_point(p);
        match (midpoint_inside, run_start) {
            (true, None) => run_start = Some(p),
            (false, Some(start)) => {
                inside_runs.push((start, p));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        inside_runs.push((start, b));
    }
    inside_runs
        .into_iter()
        .max_by(|x, y| x.0.distance_to(&x.1).partial_cmp(&y.0.distance_to(&y.1)).unwrap())
        .map(|(s, e)| Path2D::from_points(vec![s, e]))
}

/// Map a [`CutoutMode`] and offset direction to the clearing strategy and
/// run it, returning the resulting toolpaths as simple polylines.
pub fn clear_area(
    boundary: &Polygon2D,
    tool_diameter: f64,
    params: &CutoutParams,
) -> Result<Vec<Path2D>> {
    match params.mode {
        CutoutMode::Perimeter => Ok(vec![boundary.to_path()]),
        CutoutMode::Punchout => {
            let passes = spiral(boundary, tool_diameter, params, true)?;
            Ok(passes.into_iter().map(|p| p.polygon.to_path()).collect())
        }
        CutoutMode::Pocket => {
            if params.spiral_in {
                let passes = spiral(boundary, tool_diameter, params, false)?;
                Ok(passes.into_iter().map(|p| p.polygon.to_path()).collect())
            } else {
                let passes = contour_parallel(boundary, tool_diameter, params)?;
                Ok(passes.into_iter().map(|p| p.polygon.to_path()).collect())
            }
        }
        CutoutMode::Engrave => Ok(parallel_raster(boundary, tool_diameter, params, 0.0)),
    }
}
