//! Precision curve segments (lines, arcs, Bézier curves) and the
//! `PrecisionPath` they compose into — the data model tool offsetting
//! (C7) operates on.

use super::bbox::BoundingBox2D;
use super::path::Path2D;
use super::point::Point2D;

/// One segment of a [`PrecisionPath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveSegment {
    Line(Point2D, Point2D),
    Arc {
        center: Point2D,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        ccw: bool,
    },
    CubicBezier(Point2D, Point2D, Point2D, Point2D),
    QuadraticBezier(Point2D, Point2D, Point2D),
}

impl CurveSegment {
    pub fn start(&self) -> Point2D {
        match self {
            CurveSegment::Line(a, _) => *a,
            CurveSegment::Arc {
                center,
                radius,
                start_angle,
                ..
            } => *center + Point2D::new(radius * start_angle.cos(), radius * start_angle.sin()),
            CurveSegment::CubicBezier(p0, ..) => *p0,
            CurveSegment::QuadraticBezier(p0, ..) => *p0,
        }
    }

    pub fn end(&self) -> Point2D {
        self.evaluate_at(1.0)
    }

    /// Evaluate the segment at parameter `t ∈ [0,1]`.
    pub fn evaluate_at(&self, t: f64) -> Point2D {
        match self {
            CurveSegment::Line(a, b) => *a + (*b - *a) * t,
            CurveSegment::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                ccw,
            } => {
                let angle = arc_angle_at(*start_angle, *end_angle, *ccw, t);
                *center + Point2D::new(radius * angle.cos(), radius * angle.sin())
            }
            CurveSegment::CubicBezier(p0, p1, p2, p3) => {
                let u = 1.0 - t;
                *p0 * (u * u * u)
                    + *p1 * (3.0 * u * u * t)
                    + *p2 * (3.0 * u * t * t)
                    + *p3 * (t * t * t)
            }
            CurveSegment::QuadraticBezier(p0, p1, p2) => {
                let u = 1.0 - t;
                *p0 * (u * u) + *p1 * (2.0 * u * t) + *p2 * (t * t)
            }
        }
    }

    /// Unit tangent direction at `t`, via a small finite-difference step
    /// (robust across all four segment kinds without a dedicated
    /// derivative per variant).
    pub fn tangent_at(&self, t: f64) -> Point2D {
        let h = 1e-4;
        let t0 = (t - h).max(0.0);
        let t1 = (t + h).min(1.0);
        let d = self.evaluate_at(t1) - self.evaluate_at(t0);
        d.normalize()
    }

    pub fn normal_at(&self, t: f64) -> Point2D {
        self.tangent_at(t).perpendicular()
    }

    /// Approximate signed curvature via three-point finite differencing.
    pub fn curvature_at(&self, t: f64) -> f64 {
        let h = 1e-3;
        let t0 = (t - h).max(0.0);
        let t1 = t;
        let t2 = (t + h).min(1.0);
        let p0 = self.evaluate_at(t0);
        let p1 = self.evaluate_at(t1);
        let p2 = self.evaluate_at(t2);
        let d1 = p1 - p0;
        let d2 = p2 - p1;
        let cross = d1.cross(&d2);
        let denom = d1.magnitude() * d2.magnitude() * (d1 + d2).magnitude();
        if denom < 1e-12 {
            0.0
        } else {
            2.0 * cross / denom
        }
    }

    /// Flatten the segment to a polyline by uniform parameter sampling,
    /// refining until consecutive midpoint deviation is within `tolerance`.
    pub fn to_polyline(&self, tolerance: f64) -> Vec<Point2D> {
        match self {
            CurveSegment::Line(a, b) => vec![*a, *b],
            _ => {
                let mut n = 8usize;
                loop {
                    let pts: Vec<Point2D> = (0..=n)
                        .map(|i| self.evaluate_at(i as f64 / n as f64))
                        .collect();
                    let max_dev = max_midpoint_deviation(self, &pts, n);
                    if max_dev <= tolerance || n >= 256 {
                        break pts;
                    }
                    n *= 2;
                }
            }
        }
    }

    pub fn bounds(&self) -> BoundingBox2D {
        let samples: Vec<Point2D> = self.to_polyline(0.01);
        BoundingBox2D::from_points(&samples).expect("segment always has at least one point")
    }
}

fn max_midpoint_deviation(seg: &CurveSegment, pts: &[Point2D], n: usize) -> f64 {
    let mut max_dev: f64 = 0.0;
    for i in 0..n {
        let t_mid = (i as f64 + 0.5) / n as f64;
        let true_mid = seg.evaluate_at(t_mid);
        let linear_mid = Point2D::new(
            (pts[i].x + pts[i + 1].x) / 2.0,
            (pts[i].y + pts[i + 1].y) / 2.0,
        );
        max_dev = max_dev.max(true_mid.distance_to(&linear_mid));
    }
    max_dev
}

fn arc_angle_at(start: f64, end: f64, ccw: bool, t: f64) -> f64 {
    let span = if ccw {
        if end >= start {
            end - start
        } else {
            end + std::f64::consts::TAU - start
        }
    } else if end <= start {
        end - start
    } else {
        end - std::f64::consts::TAU - start
    };
    start + span * t
}

/// An ordered list of curve segments forming a precision path. Closed if
/// the last segment's endpoint meets the first segment's start under the
/// shared epsilon.
#[derive(Debug, Clone, Default)]
pub struct PrecisionPath {
    segments: Vec<CurveSegment>,
}

impl PrecisionPath {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn add_segment(&mut self, seg: CurveSegment) {
        self.segments.push(seg);
    }

    pub fn add_line(&mut self, a: Point2D, b: Point2D) {
        self.add_segment(CurveSegment::Line(a, b));
    }

    pub fn add_arc(&mut self, center: Point2D, radius: f64, start_angle: f64, end_angle: f64, ccw: bool) {
        self.add_segment(CurveSegment::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            ccw,
        });
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => first.start().approx_eq(&last.end()),
            _ => false,
        }
    }

    pub fn to_simple_path(&self, tolerance: f64) -> Path2D {
        let mut points: Vec<Point2D> = Vec::new();
        for (i, seg) in self.segments.iter().enumerate() {
            let poly = seg.to_polyline(tolerance);
            if i == 0 {
                points.extend(poly);
            } else {
                points.extend(poly.into_iter().skip(1));
            }
        }
        Path2D::from_points(points)
    }

    pub fn length(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| {
                let poly = s.to_polyline(0.01);
                poly.windows(2).map(|w| w[0].distance_to(&w[1])).sum::<f64>()
            })
            .sum()
    }

    pub fn bounds(&self) -> Option<BoundingBox2D> {
        let mut iter = self.segments.iter();
        let mut bb = iter.next()?.bounds();
        for seg in iter {
            let b = seg.bounds();
            bb.update(b.min);
            bb.update(b.max);
        }
        Some(bb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_segment_endpoints() {
        let seg = CurveSegment::Line(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0));
        assert_eq!(seg.start(), Point2D::new(0.0, 0.0));
        assert_eq!(seg.end(), Point2D::new(10.0, 0.0));
        assert_eq!(seg.evaluate_at(0.5), Point2D::new(5.0, 0.0));
    }

    #[test]
    fn cubic_bezier_endpoints_match_control_points() {
        let seg = CurveSegment::CubicBezier(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 1.0),
            Point2D::new(3.0, 0.0),
        );
        assert_eq!(seg.evaluate_at(0.0), Point2D::new(0.0, 0.0));
        assert_eq!(seg.evaluate_at(1.0), Point2D::new(3.0, 0.0));
    }

    #[test]
    fn arc_full_quarter_turn() {
        let seg = CurveSegment::Arc {
            center: Point2D::new(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            end_angle: std::f64::consts::FRAC_PI_2,
            ccw: true,
        };
        let p0 = seg.evaluate_at(0.0);
        let p1 = seg.evaluate_at(1.0);
        assert!(p0.approx_eq(&Point2D::new(1.0, 0.0)));
        assert!(p1.approx_eq(&Point2D::new(0.0, 1.0)));
    }

    #[test]
    fn precision_path_to_simple_path_is_continuous() {
        let mut path = PrecisionPath::new();
        path.add_line(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0));
        path.add_line(Point2D::new(1.0, 0.0), Point2D::new(1.0, 1.0));
        let simple = path.to_simple_path(0.01);
        assert_eq!(simple.points().first(), Some(&Point2D::new(0.0, 0.0)));
        assert_eq!(simple.points().last(), Some(&Point2D::new(1.0, 1.0)));
    }
}
