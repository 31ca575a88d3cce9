//! Pipeline orchestration: the single public entry point wiring the 2D
//! vector path (discretize → fit → offset → clear → optimize → emit)
//! together, grounded in `cam_processor.cpp`'s `processForCAM`.

use millwright_core::geom::{Path2D, Point2D, Polygon2D};
use millwright_core::{CNConfig, GCodeOptions, OffsetDirection, Tool, ValidationReport};

use crate::discretizer::{discretize_shapes, DiscretizerConfig, SvgShape};
use crate::error::{Result, ValidationError};
use crate::fit::{fit_to_bed, FitMode};
use crate::gcode::{emit_program, ToolpathJob};
use crate::optimizer::{clean_path, order_paths};
use crate::tool_offset::{offset_path, resolve_auto_direction, OffsetOptions, OffsetSide};
use crate::validator::{validate_material_fit, validate_polygons, validate_tool_for_feature};
use millwright_core::geom::PrecisionPath;

const REDUNDANT_POINT_DISTANCE_MM: f64 = 1e-6;

/// Result of a full pipeline run: the emitted program text plus the
/// validation findings collected along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct GCodeResult {
    pub program: String,
    pub report: ValidationReport,
}

fn path_to_polygon(path: &Path2D) -> Option<Polygon2D> {
    if path.len() < 3 {
        None
    } else {
        Some(Polygon2D::from_points(path.points().to_vec()))
    }
}

fn path_to_precision_path(path: &Path2D) -> PrecisionPath {
    let mut precision = PrecisionPath::new();
    let points = path.points();
    for w in points.windows(2) {
        precision.add_line(w[0], w[1]);
    }
    precision
}

/// Run the full C1-C11 pipeline over a forest of already-parsed SVG
/// shapes: discretize, fit to the machine bed, optionally apply tool
/// offsetting and area clearing, optimize, validate, and emit G-code.
pub fn generate_gcode(
    shapes: &[SvgShape],
    discretizer_config: &DiscretizerConfig,
    config: &CNConfig,
    options: &GCodeOptions,
    tool: Option<&Tool>,
) -> Result<GCodeResult> {
    let mut report = ValidationReport::new();

    let discretized = discretize_shapes(shapes, discretizer_config);
    if discretized.is_empty() {
        report.add_error(ValidationError::NoPathsToEmit.to_string());
        return Ok(GCodeResult {
            program: String::new(),
            report,
        });
    }

    if let Some(bounds) = combined_bounds(&discretized) {
        validate_material_fit(&bounds, config, &mut report);
    }

    let (fitted, transform) = fit_to_bed(
        &discretized,
        config.material_width,
        config.material_height,
        config.bed_width,
        config.bed_height,
        FitMode::PreserveAspect,
    );
    if transform.was_cropped {
        report.add_warning(transform.message.clone());
    }

    let mut working_paths = fitted;

    if options.enable_tool_offsets {
        if let Some(tool) = tool {
            working_paths = apply_offsets(&working_paths, tool.radius(), options.offset_direction, &mut report);
        }
    }

    let polygons: Vec<Polygon2D> = working_paths.iter().filter_map(path_to_polygon).collect();
    if !polygons.is_empty() {
        validate_polygons(&polygons, &mut report);
        if options.validate_feature_sizes {
            if let Some(tool) = tool {
                for polygon in &polygons {
                    validate_tool_for_feature(tool, polygon, &mut report);
                }
            }
        }
    }

    if options.linearize_paths {
        working_paths = working_paths
            .iter()
            .map(|p| clean_path(p, REDUNDANT_POINT_DISTANCE_MM, options.linearize_tolerance))
            .collect();
    }

    if options.optimize_paths {
        working_paths = order_paths(working_paths, Point2D::new(0.0, 0.0));
    }

    if working_paths.is_empty() {
        report.add_error(ValidationError::NoPathsToEmit.to_string());
        return Ok(GCodeResult {
            program: String::new(),
            report,
        });
    }

    let jobs: Vec<ToolpathJob> = working_paths
        .into_iter()
        .map(|path| ToolpathJob {
            path,
            safe_height: config.safe_height,
            cut_depth: config.cut_depth_per_pass * config.pass_count as f64,
            feed_rate: config.feed_rate,
            plunge_rate: config.plunge_rate,
        })
        .collect();

    let program = emit_program(&jobs, config, options, tool);

    Ok(GCodeResult { program, report })
}

fn apply_offsets(
    paths: &[Path2D],
    radius: f64,
    direction: OffsetDirection,
    report: &mut ValidationReport,
) -> Vec<Path2D> {
    let options = OffsetOptions::default();
    paths
        .iter()
        .map(|path| {
            let precision = path_to_precision_path(path);
            let side = match direction {
                OffsetDirection::Inside => OffsetSide::Inside,
                OffsetDirection::Outside => OffsetSide::Outside,
                OffsetDirection::OnPath => return path.clone(),
                OffsetDirection::Auto => match resolve_auto_direction(&precision) {
                    Ok(side) => side,
                    Err(e) => {
                        report.add_warning(format!("could not resolve offset direction: {e}"));
                        return path.clone();
                    }
                },
            };
            match offset_path(&precision, radius, side, &options) {
                Ok(offset) => offset.to_simple_path(options.tolerance),
                Err(e) => {
                    report.add_warning(format!("offset failed, using original path: {e}"));
                    path.clone()
                }
            }
        })
        .collect()
}

fn combined_bounds(paths: &[Path2D]) -> Option<millwright_core::geom::BoundingBox2D> {
    let mut bounds: Option<millwright_core::geom::BoundingBox2D> = None;
    for path in paths {
        if let Some(b) = path.bounds() {
            bounds = Some(match bounds {
                Some(mut acc) => {
                    acc.update(b.min);
                    acc.update(b.max);
                    acc
                }
                None => b,
            });
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::Point as LyonPoint;
    use lyon::path::Path as LyonPath;
    use millwright_core::geom::BoundingBox2D;
    use millwright_core::ToolId;
    use millwright_core::ToolType;

    fn square_shape() -> SvgShape {
        let mut builder = LyonPath::builder();
        builder.begin(LyonPoint::new(0.0, 0.0));
        builder.line_to(LyonPoint::new(10.0, 0.0));
        builder.line_to(LyonPoint::new(10.0, 10.0));
        builder.line_to(LyonPoint::new(0.0, 10.0));
        builder.end(true);
        let path = builder.build();
        SvgShape {
            id: "square".into(),
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            bounds: BoundingBox2D::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)),
            path,
        }
    }

    #[test]
    fn pipeline_emits_nonempty_program_for_a_square() {
        let config = CNConfig::default();
        let options = GCodeOptions::default();
        let result = generate_gcode(&[square_shape()], &DiscretizerConfig::default(), &config, &options, None).unwrap();
        assert!(!result.program.is_empty());
        assert!(result.report.ok);
    }

    #[test]
    fn pipeline_applies_tool_offset_when_enabled() {
        let config = CNConfig::default();
        let mut options = GCodeOptions::default();
        options.enable_tool_offsets = true;
        options.offset_direction = OffsetDirection::Outside;
        let tool = Tool::new(ToolId(1), "test", ToolType::EndMill, 6.0);
        let result = generate_gcode(&[square_shape()], &DiscretizerConfig::default(), &config, &options, Some(&tool)).unwrap();
        assert!(!result.program.is_empty());
    }

    #[test]
    fn empty_shapes_produce_no_paths_error() {
        let config = CNConfig::default();
        let options = GCodeOptions::default();
        let result = generate_gcode(&[], &DiscretizerConfig::default(), &config, &options, None).unwrap();
        assert!(!result.report.ok);
        assert!(result.program.is_empty());
    }

    #[test]
    fn oversized_design_triggers_material_fit_error() {
        let mut config = CNConfig::default();
        config.material_width = 1.0;
        config.material_height = 1.0;
        let options = GCodeOptions::default();
        let result = generate_gcode(&[square_shape()], &DiscretizerConfig::default(), &config, &options, None).unwrap();
        assert!(!result.report.ok);
    }
}
