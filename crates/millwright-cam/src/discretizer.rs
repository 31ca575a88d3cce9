//! SVG discretizer (C2): turns parsed vector shapes into polylines.
//!
//! The actual SVG text parsing is an external collaborator (spec §6); this
//! module consumes an already-parsed forest of shapes, each carrying a
//! `lyon::path::Path` of line/cubic/quadratic segments, exactly the way
//! `gcodekit5-camtools::vector_engraver` treats `lyon::path::Path` as its
//! internal curve representation.

use lyon::math::Point as LyonPoint;
use lyon::path::{Event, Path as LyonPath};
use millwright_core::geom::{BoundingBox2D, Path2D, Point2D};

/// A single parsed vector shape, as handed over by the external SVG
/// parser.
#[derive(Debug, Clone)]
pub struct SvgShape {
    pub id: String,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub bounds: BoundingBox2D,
    pub path: LyonPath,
}

/// Sampling configuration for the discretizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscretizerConfig {
    /// Number of points to sample along a bezier curve in fixed mode.
    pub bezier_samples: u32,
    /// Tolerance for Douglas-Peucker simplification (0 = disabled).
    pub simplify_tolerance: f64,
    /// Flatness tolerance for adaptive sampling (0 = disabled, uses fixed
    /// sampling instead).
    pub adaptive_sampling: f64,
    /// Maximum distance between points when using adaptive sampling; also
    /// bounds the recursion depth so pathological control points cannot
    /// subdivide forever.
    pub max_point_distance: f64,
}

impl Default for DiscretizerConfig {
    fn default() -> Self {
        Self {
            bezier_samples: 10,
            simplify_tolerance: 0.0,
            adaptive_sampling: 0.0,
            max_point_distance: 1.0,
        }
    }
}

/// Hard ceiling on recursion depth regardless of `max_point_distance`, so a
/// degenerate (near-zero) distance can't recurse indefinitely.
const MAX_ADAPTIVE_DEPTH: u32 = 24;

/// Depth at which the chord between two points produced by repeated
/// de Casteljau bisection first falls under `max_point_distance`, i.e. the
/// recursion-depth cap `max_point_distance` imposes for a curve whose
/// endpoints are `chord` apart. A non-positive `max_point_distance` disables
/// the derived cap, leaving only `MAX_ADAPTIVE_DEPTH`.
fn depth_cap_for_chord(chord: f64, max_point_distance: f64) -> u32 {
    if max_point_distance <= 0.0 || chord <= max_point_distance {
        return MAX_ADAPTIVE_DEPTH;
    }
    let needed = (chord / max_point_distance).log2().ceil().max(0.0) as u32;
    needed.min(MAX_ADAPTIVE_DEPTH)
}

fn to_point(p: LyonPoint) -> Point2D {
    Point2D::new(p.x as f64, p.y as f64)
}

fn lerp(a: Point2D, b: Point2D) -> Point2D {
    Point2D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn evaluate_cubic(p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D, t: f64) -> Point2D {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// `max(|3p1-2p0-p3|^2, |3p2-2p3-p0|^2)` taken componentwise (x and y
/// evaluated separately, then summed) — the flatness metric from spec §4.1.
fn flatness(p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D) -> f64 {
    let d1x = 3.0 * p1.x - 2.0 * p0.x - p3.x;
    let d1y = 3.0 * p1.y - 2.0 * p0.y - p3.y;
    let d2x = 3.0 * p2.x - 2.0 * p3.x - p0.x;
    let d2y = 3.0 * p2.y - 2.0 * p3.y - p0.y;
    d1x.powi(2).max(d2x.powi(2)) + d1y.powi(2).max(d2y.powi(2))
}

fn de_casteljau_split(
    p0: Point2D,
    p1: Point2D,
    p2: Point2D,
    p3: Point2D,
) -> ((Point2D, Point2D, Point2D, Point2D), (Point2D, Point2D, Point2D, Point2D)) {
    let p01 = lerp(p0, p1);
    let p12 = lerp(p1, p2);
    let p23 = lerp(p2, p3);
    let p012 = lerp(p01, p12);
    let p123 = lerp(p12, p23);
    let p0123 = lerp(p012, p123);
    ((p0, p01, p012, p0123), (p0123, p123, p23, p3))
}

fn adaptive_sample_cubic(
    p0: Point2D,
    p1: Point2D,
    p2: Point2D,
    p3: Point2D,
    tolerance: f64,
    depth: u32,
    max_depth: u32,
    out: &mut Vec<Point2D>,
) {
    if depth >= max_depth || flatness(p0, p1, p2, p3) <= tolerance {
        out.push(p3);
        return;
    }
    let (left, right) = de_casteljau_split(p0, p1, p2, p3);
    adaptive_sample_cubic(left.0, left.1, left.2, left.3, tolerance, depth + 1, max_depth, out);
    adaptive_sample_cubic(right.0, right.1, right.2, right.3, tolerance, depth + 1, max_depth, out);
}

fn fixed_sample_cubic(
    p0: Point2D,
    p1: Point2D,
    p2: Point2D,
    p3: Point2D,
    samples: u32,
    out: &mut Vec<Point2D>,
) {
    let n = samples.max(2);
    for k in 1..=n {
        out.push(evaluate_cubic(p0, p1, p2, p3, k as f64 / n as f64));
    }
}

fn emit_cubic(p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D, config: &DiscretizerConfig, out: &mut Vec<Point2D>) {
    if config.adaptive_sampling > 0.0 {
        let chord = p0.distance_to(&p3);
        let max_depth = depth_cap_for_chord(chord, config.max_point_distance);
        adaptive_sample_cubic(p0, p1, p2, p3, config.adaptive_sampling, 0, max_depth, out);
    } else {
        fixed_sample_cubic(p0, p1, p2, p3, config.bezier_samples, out);
    }
}

/// Discretize every cubic/line/quadratic segment of a single `lyon::Path`
/// into zero or more polylines (one per subpath).
pub fn discretize_path(path: &LyonPath, config: &DiscretizerConfig) -> Vec<Path2D> {
    let mut results = Vec::new();
    let mut current: Vec<Point2D> = Vec::new();

    for event in path.iter() {
        match event {
            Event::Begin { at } => {
                current.clear();
                current.push(to_point(at));
            }
            Event::Line { to, .. } => {
                current.push(to_point(to));
            }
            Event::Quadratic { ctrl, to, from } => {
                // Elevate to cubic: c1 = p0 + 2/3(ctrl-p0), c2 = p3 + 2/3(ctrl-p3).
                let p0 = to_point(from);
                let c = to_point(ctrl);
                let p3 = to_point(to);
                let c1 = p0 + (c - p0) * (2.0 / 3.0);
                let c2 = p3 + (c - p3) * (2.0 / 3.0);
                emit_cubic(p0, c1, c2, p3, config, &mut current);
            }
            Event::Cubic {
                ctrl1,
                ctrl2,
                to,
                from,
            } => {
                emit_cubic(
                    to_point(from),
                    to_point(ctrl1),
                    to_point(ctrl2),
                    to_point(to),
                    config,
                    &mut current,
                );
            }
            Event::End { close, first, .. } => {
                if close {
                    let first = to_point(first);
                    if current.last().map(|p| !p.approx_eq(&first)).unwrap_or(false) {
                        current.push(first);
                    }
                }
                if !current.is_empty() {
                    let mut path2d = Path2D::from_points(std::mem::take(&mut current));
                    if config.simplify_tolerance > 0.0 {
                        path2d = path2d.simplify(config.simplify_tolerance);
                    }
                    results.push(path2d);
                }
            }
        }
    }
    results
}

/// Discretize every subpath of every shape in a forest of parsed shapes.
pub fn discretize_shapes(shapes: &[SvgShape], config: &DiscretizerConfig) -> Vec<Path2D> {
    shapes
        .iter()
        .flat_map(|shape| discretize_path(&shape.path, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::path::Path as LyonPath;

    fn quarter_circle_path() -> LyonPath {
        let mut builder = LyonPath::builder();
        builder.begin(LyonPoint::new(1.0, 0.0));
        // Cubic approximation of a quarter circle arc.
        builder.cubic_bezier_to(
            LyonPoint::new(1.0, 0.5523),
            LyonPoint::new(0.5523, 1.0),
            LyonPoint::new(0.0, 1.0),
        );
        builder.end(false);
        builder.build()
    }

    #[test]
    fn fixed_sampling_emits_requested_point_count() {
        let path = quarter_circle_path();
        let config = DiscretizerConfig {
            bezier_samples: 10,
            ..Default::default()
        };
        let polylines = discretize_path(&path, &config);
        assert_eq!(polylines.len(), 1);
        // p0 plus 10 sampled points.
        assert_eq!(polylines[0].len(), 11);
    }

    #[test]
    fn adaptive_sampling_respects_flatness_tolerance() {
        let path = quarter_circle_path();
        let config = DiscretizerConfig {
            adaptive_sampling: 1e-4,
            ..Default::default()
        };
        let coarse = discretize_path(
            &path,
            &DiscretizerConfig {
                adaptive_sampling: 1.0,
                ..Default::default()
            },
        );
        let fine = discretize_path(&path, &config);
        assert!(fine[0].len() > coarse[0].len());
    }

    #[test]
    fn simplify_tolerance_reduces_point_count() {
        let path = quarter_circle_path();
        let config = DiscretizerConfig {
            bezier_samples: 50,
            simplify_tolerance: 0.05,
            ..Default::default()
        };
        let unsimplified = discretize_path(
            &path,
            &DiscretizerConfig {
                bezier_samples: 50,
                ..Default::default()
            },
        );
        let simplified = discretize_path(&path, &config);
        assert!(simplified[0].len() < unsimplified[0].len());
    }

    #[test]
    fn max_point_distance_caps_recursion_even_with_tight_flatness() {
        let path = quarter_circle_path();
        // The flatness tolerance alone (1e-9) would keep splitting well
        // past depth 3; a `max_point_distance` close to the curve's own
        // chord length should cap recursion much sooner than one that's
        // effectively zero.
        let loosely_capped = discretize_path(
            &path,
            &DiscretizerConfig {
                adaptive_sampling: 1e-9,
                max_point_distance: 1.0,
                ..Default::default()
            },
        );
        let tightly_capped = discretize_path(
            &path,
            &DiscretizerConfig {
                adaptive_sampling: 1e-9,
                max_point_distance: 1e-6,
                ..Default::default()
            },
        );
        assert!(tightly_capped[0].len() > loosely_capped[0].len());
    }

    #[test]
    fn depth_cap_for_chord_is_derived_not_constant() {
        assert_eq!(depth_cap_for_chord(1.0, 1.0), MAX_ADAPTIVE_DEPTH);
        assert_eq!(depth_cap_for_chord(8.0, 1.0), 3);
        assert_eq!(depth_cap_for_chord(1000.0, 1e-9), MAX_ADAPTIVE_DEPTH);
    }

    #[test]
    fn empty_path_yields_empty_result() {
        let path = LyonPath::builder().build();
        let result = discretize_path(&path, &DiscretizerConfig::default());
        assert!(result.is_empty());
    }
}
