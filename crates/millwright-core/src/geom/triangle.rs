//! `Triangle`: three 3D vertices plus a computed unit normal, used by the
//! STL mesh analyzer.

use super::point::Point3D;

/// A mesh triangle. Degenerate triangles (near-zero cross product) should
/// be rejected by the loader before construction; `new` still computes
/// whatever normal results so callers can decide how to handle it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3D; 3],
    pub normal: Point3D,
}

impl Triangle {
    /// Build a triangle, computing its unit normal from `cross(e1, e2)`.
    pub fn new(v0: Point3D, v1: Point3D, v2: Point3D) -> Self {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let normal = e1.cross(&e2).normalize();
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }

    /// `true` if `cross(e1, e2).magnitude() > 1e-9`, i.e. non-degenerate.
    pub fn is_non_degenerate(&self) -> bool {
        let e1 = self.vertices[1] - self.vertices[0];
        let e2 = self.vertices[2] - self.vertices[0];
        e1.cross(&e2).magnitude() > 1e-9
    }

    pub fn centroid(&self) -> Point3D {
        let [a, b, c] = self.vertices;
        Point3D::new(
            (a.x + b.x + c.x) / 3.0,
            (a.y + b.y + c.y) / 3.0,
            (a.z + b.z + c.z) / 3.0,
        )
    }

    pub fn z_range(&self) -> (f64, f64) {
        let zs = self.vertices.map(|v| v.z);
        (
            zs.iter().cloned().fold(f64::INFINITY, f64::min),
            zs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_of_xy_plane_triangle_points_up() {
        let t = Triangle::new(
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
        );
        assert!((t.normal.z - 1.0).abs() < 1e-9);
        assert!(t.is_non_degenerate());
    }

    #[test]
    fn collinear_vertices_are_degenerate() {
        let t = Triangle::new(
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(2.0, 0.0, 0.0),
        );
        assert!(!t.is_non_degenerate());
    }

    #[test]
    fn centroid_is_vertex_average() {
        let t = Triangle::new(
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(3.0, 0.0, 0.0),
            Point3D::new(0.0, 3.0, 0.0),
        );
        assert_eq!(t.centroid(), Point3D::new(1.0, 1.0, 0.0));
    }
}
