//! Property-based tests for the CAM-layer invariants.

use millwright_cam::tool_offset::{offset_path, OffsetOptions, OffsetSide};
use millwright_core::geom::{Point2D, PrecisionPath};
use proptest::prelude::*;

fn convex_polygon_path(radius: f64, sides: usize) -> PrecisionPath {
    let mut path = PrecisionPath::new();
    let pts: Vec<Point2D> = (0..sides)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / sides as f64;
            Point2D::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    for i in 0..sides {
        path.add_line(pts[i], pts[(i + 1) % sides]);
    }
    path
}

proptest! {
    /// Invariant 5: for a convex polygon, inward offsets by increasing
    /// distances produce strictly decreasing area, up to the point where
    /// the offset collapses (quality gate returns the original instead).
    #[test]
    fn inward_offset_area_decreases_monotonically(
        radius in 10.0f64..50.0,
        d1 in 1.0f64..5.0,
        delta in 0.5f64..4.0,
    ) {
        let d2 = d1 + delta;
        prop_assume!(d2 < radius * 0.8);
        let path = convex_polygon_path(radius, 12);
        let options = OffsetOptions::default();

        let original_area = path.to_simple_path(0.01).length();
        let _ = original_area;

        let o1 = offset_path(&path, d1, OffsetSide::Inside, &options).unwrap();
        let o2 = offset_path(&path, d2, OffsetSide::Inside, &options).unwrap();

        let area_of = |p: &PrecisionPath| {
            let pts = p.to_simple_path(0.01).into_points();
            millwright_core::geom::Polygon2D::from_points(pts).area()
        };
        let base_polygon = millwright_core::geom::Polygon2D::from_points(
            path.to_simple_path(0.01).into_points(),
        );

        prop_assert!(area_of(&o2) < area_of(&o1));
        prop_assert!(area_of(&o1) < base_polygon.area());
    }
}

#[test]
fn emission_is_byte_identical_across_runs() {
    use millwright_cam::gcode::{emit_program, ToolpathJob};
    use millwright_core::geom::Path2D;
    use millwright_core::{CNConfig, GCodeOptions};

    let job = ToolpathJob {
        path: Path2D::from_points(vec![Point2D::new(0.0, 0.0), Point2D::new(5.0, 5.0)]),
        safe_height: 5.0,
        cut_depth: 2.0,
        feed_rate: 600.0,
        plunge_rate: 150.0,
    };
    let config = CNConfig::default();
    let options = GCodeOptions::default();
    let a = emit_program(&[job.clone()], &config, &options, None);
    let b = emit_program(&[job], &config, &options, None);
    assert_eq!(a, b);
}
