//! Axis-aligned bounding boxes in 2D and 3D.

use super::point::{Point2D, Point3D};

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl BoundingBox2D {
    pub fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    /// Bounding box of a single point, used as the seed for `update`.
    pub fn of_point(p: Point2D) -> Self {
        Self { min: p, max: p }
    }

    pub fn update(&mut self, p: Point2D) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn from_points(points: &[Point2D]) -> Option<Self> {
        let mut iter = points.iter();
        let first = *iter.next()?;
        let mut bb = Self::of_point(first);
        for p in iter {
            bb.update(*p);
        }
        Some(bb)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn diagonal(&self) -> f64 {
        self.min.distance_to(&self.max)
    }
}

/// 3D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox3D {
    pub min: Point3D,
    pub max: Point3D,
}

impl BoundingBox3D {
    pub fn of_point(p: Point3D) -> Self {
        Self { min: p, max: p }
    }

    pub fn update(&mut self, p: Point3D) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn from_points(points: &[Point3D]) -> Option<Self> {
        let mut iter = points.iter();
        let first = *iter.next()?;
        let mut bb = Self::of_point(first);
        for p in iter {
            bb.update(*p);
        }
        Some(bb)
    }

    pub fn size(&self) -> (f64, f64, f64) {
        (
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }

    pub fn center(&self) -> Point3D {
        Point3D::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_expands_bounds() {
        let mut bb = BoundingBox2D::of_point(Point2D::new(0.0, 0.0));
        bb.update(Point2D::new(5.0, -2.0));
        bb.update(Point2D::new(-1.0, 3.0));
        assert_eq!(bb.min, Point2D::new(-1.0, -2.0));
        assert_eq!(bb.max, Point2D::new(5.0, 3.0));
        assert_eq!(bb.size(), (6.0, 5.0));
    }

    #[test]
    fn center_is_midpoint() {
        let bb = BoundingBox2D::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 20.0));
        assert_eq!(bb.center(), Point2D::new(5.0, 10.0));
    }
}
