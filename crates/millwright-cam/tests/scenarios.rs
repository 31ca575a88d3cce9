//! End-to-end scenario tests exercising the full pipeline surface.

use millwright_cam::area_cutter::{spiral, ClearingPass};
use millwright_cam::fit::{fit_to_bed, FitMode};
use millwright_cam::gcode::{emit_program, estimate_time, ToolpathJob};
use millwright_cam::mesh::{analyze_mesh, MachiningParams};
use millwright_cam::optimizer::clean_path;
use millwright_cam::tool_offset::{offset_path, OffsetOptions, OffsetSide};
use millwright_core::geom::{Path2D, Point2D, PrecisionPath, Triangle};
use millwright_core::{CNConfig, CutoutMode, CutoutParams, GCodeOptions};

fn unit_square_precision_path() -> PrecisionPath {
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

fn cube_triangles(size: f64) -> Vec<Triangle> {
    let v = |x: f64, y: f64, z: f64| millwright_core::geom::Point3D::new(x, y, z);
    let faces = [
        (v(0.0, 0.0, 0.0), v(size, size, 0.0), v(size, 0.0, 0.0)),
        (v(0.0, 0.0, 0.0), v(0.0, size, 0.0), v(size, size, 0.0)),
        (v(0.0, 0.0, size), v(size, 0.0, size), v(size, size, size)),
        (v(0.0, 0.0, size), v(size, size, size), v(0.0, size, size)),
        (v(0.0, 0.0, 0.0), v(size, 0.0, 0.0), v(size, 0.0, size)),
        (v(0.0, 0.0, 0.0), v(size, 0.0, size), v(0.0, 0.0, size)),
        (v(size, 0.0, 0.0), v(size, size, 0.0), v(size, size, size)),
        (v(size, 0.0, 0.0), v(size, size, size), v(size, 0.0, size)),
    ];
    faces.iter().map(|(a, b, c)| Triangle::new(*a, *b, *c)).collect()
}

/// Scenario A: unit square perimeter, 6mm end mill, outside offset —
/// three plunge/cut/retract passes, ending with the spindle off.
#[test]
fn scenario_a_unit_square_outside_offset_three_passes() {
    let path = unit_square_precision_path();
    let offset = offset_path(&path, 3.0, OffsetSide::Outside, &OffsetOptions::default()).unwrap();
    let simple = offset.to_simple_path(0.01);
    assert!(simple.bounds().unwrap().width() > 10.0);

    let mut config = CNConfig::default();
    config.cut_depth_per_pass = 1.0;
    config.pass_count = 3;
    config.safe_height = 5.0;
    config.feed_rate = 500.0;
    config.plunge_rate = 100.0;

    let job = ToolpathJob {
        path: simple,
        safe_height: config.safe_height,
        cut_depth: config.cut_depth_per_pass * config.pass_count as f64,
        feed_rate: config.feed_rate,
        plunge_rate: config.plunge_rate,
    };
    let options = GCodeOptions::default();
    let program = emit_program(&[job], &config, &options, None);
    assert_eq!(program.matches("G01 Z").count(), 3);
    assert!(program.trim_end().lines().any(|l| l.starts_with("M05")));
}

/// Scenario B: pocket, circle approximated by a regular polygon, spiral
/// inward, producing multiple closed passes of decreasing radius.
#[test]
fn scenario_b_pocket_spiral_produces_multiple_passes() {
    let n = 64;
    let radius = 20.0;
    let points: Vec<Point2D> = (0..n)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            Point2D::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    let circle = millwright_core::geom::Polygon2D::from_points(points);

    let params = CutoutParams {
        mode: CutoutMode::Pocket,
        stepover: 0.5,
        spiral_in: true,
        ..CutoutParams::default()
    };
    let passes: Vec<ClearingPass> = spiral(&circle, 6.0, &params, true).unwrap();
    assert!(passes.len() >= 5);
    for pass in &passes {
        assert!(pass.polygon.len() >= 3);
    }
}

/// Scenario D: 20mm cube, tool length 30mm / diameter 6mm, draft
/// threshold 1 degree — no undercuts, no draft failures, material fits.
#[test]
fn scenario_d_cube_mesh_has_no_undercuts_or_draft_failures() {
    let triangles = cube_triangles(20.0);
    let params = MachiningParams {
        tool_diameter: 6.0,
        tool_length: 30.0,
        stepdown: 5.0,
        min_draft_angle_deg: 1.0,
        material_height: 20.0,
    };
    let analysis = analyze_mesh(&triangles, &params).unwrap();
    assert!(analysis.undercut_triangles.is_empty());
    assert!(analysis.draft_violation_triangles.is_empty());
    assert!(analysis.material_fits);
}

/// Scenario E: a 300x200 design fit onto 200x200 material with aspect
/// preserved scales by min(200/300, 200/200) = 2/3 and is not cropped.
#[test]
fn scenario_e_oversized_design_scales_by_expected_factor() {
    let design = Path2D::from_points(vec![
        Point2D::new(0.0, 0.0),
        Point2D::new(300.0, 0.0),
        Point2D::new(300.0, 200.0),
        Point2D::new(0.0, 200.0),
    ]);
    let (_, info) = fit_to_bed(&[design], 200.0, 200.0, 200.0, 200.0, FitMode::PreserveAspect);
    assert!((info.scale_x - 2.0 / 3.0).abs() < 1e-9);
    assert!(!info.was_cropped);
}

/// Scenario F: 1000 collinear points linearize down to two points (start
/// and farthest endpoint).
#[test]
fn scenario_f_collinear_points_linearize_to_two_points() {
    let points: Vec<Point2D> = (0..1000).map(|i| Point2D::new(i as f64 * 0.01, 0.0)).collect();
    let path = Path2D::from_points(points);
    let cleaned = clean_path(&path, 1e-6, 0.01);
    assert_eq!(cleaned.len(), 2);
}

#[test]
fn time_estimate_scales_with_feed_rate() {
    let job_slow = ToolpathJob {
        path: Path2D::from_points(vec![Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0)]),
        safe_height: 5.0,
        cut_depth: 1.0,
        feed_rate: 100.0,
        plunge_rate: 100.0,
    };
    let job_fast = ToolpathJob {
        feed_rate: 1000.0,
        ..job_slow.clone()
    };
    let slow = estimate_time(&[job_slow]);
    let fast = estimate_time(&[job_fast]);
    assert!(slow.estimated_seconds > fast.estimated_seconds);
}
