//! Property-based tests for invariants that must hold across arbitrary
//! inputs, not just the handful of examples covered by unit tests.

use millwright_core::geom::{Path2D, Point2D, Polygon2D};
use proptest::prelude::*;

fn arb_point() -> impl Strategy<Value = Point2D> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point2D::new(x, y))
}

fn arb_path(min_len: usize, max_len: usize) -> impl Strategy<Value = Path2D> {
    prop::collection::vec(arb_point(), min_len..=max_len).prop_map(Path2D::from_points)
}

proptest! {
    /// Invariant 2: simplify is idempotent — running it twice with the
    /// same tolerance yields the same result as running it once.
    #[test]
    fn simplify_is_idempotent(path in arb_path(2, 40), tolerance in 0.01f64..5.0) {
        let once = path.simplify(tolerance);
        let twice = once.simplify(tolerance);
        prop_assert_eq!(once, twice);
    }

    /// Invariant 3: a polygon and its point-reversal always disagree on
    /// orientation, for any non-degenerate polygon (nonzero area).
    #[test]
    fn reverse_flips_clockwise_for_nondegenerate_polygons(path in arb_path(3, 20)) {
        let polygon = Polygon2D::from_points(path.into_points());
        if polygon.area() > 1e-6 {
            prop_assert_ne!(polygon.is_clockwise(), polygon.reverse().is_clockwise());
        }
    }

    /// Simplification never increases point count.
    #[test]
    fn simplify_never_grows_the_path(path in arb_path(2, 60), tolerance in 0.0f64..10.0) {
        let simplified = path.simplify(tolerance);
        prop_assert!(simplified.len() <= path.len());
    }
}
