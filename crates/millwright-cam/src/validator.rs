//! Validator (C10): aggregates tool-vs-feature, self-intersection,
//! material-fit, and mesh-check findings into a single [`ValidationReport`].

use millwright_core::geom::Polygon2D;
use millwright_core::{CNConfig, Tool, ValidationReport};

use crate::mesh::{analyze_mesh, MachiningParams, MeshAnalysis};
use millwright_core::geom::Triangle;

/// A polygon with more than this many points is too expensive to
/// self-intersection-check in the validator (optimization happens
/// upstream in C9; here we just skip the check and move on).
const SELF_INTERSECTION_CHECK_LIMIT: usize = 100;

/// `true` if any two non-adjacent edges of `polygon` cross.
fn has_self_intersections(polygon: &Polygon2D) -> bool {
    let points = polygon.points();
    let n = points.len();
    if n > SELF_INTERSECTION_CHECK_LIMIT {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (points[i], points[(i + 1) % n]);
        for j in (i + 1)..n {
            if j == i || (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            let (b1, b2) = (points[j], points[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

fn segments_intersect(
    a1: millwright_core::geom::Point2D,
    a2: millwright_core::geom::Point2D,
    b1: millwright_core::geom::Point2D,
    b2: millwright_core::geom::Point2D,
) -> bool {
    let d1 = (a2 - a1).cross(&(b1 - a1));
    let d2 = (a2 - a1).cross(&(b2 - a1));
    let d3 = (b2 - b1).cross(&(a1 - b1));
    let d4 = (b2 - b1).cross(&(a2 - b1));
    (d1 > 0.0) != (d2 > 0.0) && (d3 > 0.0) != (d4 > 0.0)
}

/// Validate a tool against a polygon feature: the tool must fit within
/// the smaller bounding-box dimension with headroom (`1.5 * diameter`),
/// and the polygon's minimum circular footprint (`2*pi*r^2`) must cover
/// the tool.
pub fn validate_tool_for_feature(tool: &Tool, polygon: &Polygon2D, report: &mut ValidationReport) {
    let Some(bounds) = polygon.bounds() else {
        report.add_error("feature has no area to validate against a tool");
        return;
    };
    let (w, h) = bounds.size();
    let smallest_dim = w.min(h);
    if smallest_dim < 1.5 * tool.diameter {
        report.add_warning(format!(
            "tool too large: feature's smallest dimension ({smallest_dim:.3}mm) is under 1.5x the {:.3}mm tool diameter",
            tool.diameter
        ));
    }
    if polygon.area() < 2.0 * std::f64::consts::PI * tool.radius().powi(2) {
        report.add_warning(format!(
            "tool too large: feature area ({:.3}mm^2) is smaller than the tool's minimum circular footprint",
            polygon.area()
        ));
    }
}

/// Validate design bounds against stock material dimensions.
pub fn validate_material_fit(design_bounds: &millwright_core::geom::BoundingBox2D, config: &CNConfig, report: &mut ValidationReport) {
    if design_bounds.width() > config.material_width || design_bounds.height() > config.material_height {
        report.add_error(format!(
            "design ({:.1}x{:.1}mm) does not fit material stock ({:.1}x{:.1}mm)",
            design_bounds.width(),
            design_bounds.height(),
            config.material_width,
            config.material_height,
        ));
    }
}

/// Validate every polygon in a cleared region for self-intersection.
pub fn validate_polygons(polygons: &[Polygon2D], report: &mut ValidationReport) {
    for (i, polygon) in polygons.iter().enumerate() {
        if has_self_intersections(polygon) {
            report.add_warning(format!("path {i} self-intersects"));
        }
    }
}

/// Validate a 3D mesh against the given machining parameters, folding
/// [`MeshAnalysis`] findings into the report.
pub fn validate_mesh(triangles: &[Triangle], params: &MachiningParams, report: &mut ValidationReport) -> Option<MeshAnalysis> {
    match analyze_mesh(triangles, params) {
        Ok(analysis) => {
            if !analysis.undercut_triangles.is_empty() {
                report.add_warning(format!(
                    "{} triangle(s) have undercut geometry unreachable from above",
                    analysis.undercut_triangles.len()
                ));
            }
            if !analysis.unreachable_triangles.is_empty() {
                report.add_warning(format!(
                    "{} triangle(s) are unreachable by the selected tool",
                    analysis.unreachable_triangles.len()
                ));
            }
            if !analysis.draft_violation_triangles.is_empty() {
                report.add_warning(format!(
                    "{} triangle(s) have draft angle below the configured minimum",
                    analysis.draft_violation_triangles.len()
                ));
            }
            if !analysis.material_fits {
                report.add_error("mesh height exceeds configured material thickness");
            }
            for warning in &analysis.stepdown_warnings {
                report.add_warning(warning.clone());
            }
            Some(analysis)
        }
        Err(e) => {
            report.add_error(format!("mesh analysis failed: {e}"));
            None
        }
    }
}
