//! Geometry primitives: points, bounding boxes, polylines, polygons, and
//! the precision curve-segment model used by tool offsetting.

mod bbox;
mod curve;
mod path;
mod point;
mod polygon;
mod triangle;

pub use bbox::{BoundingBox2D, BoundingBox3D};
pub use curve::{CurveSegment, PrecisionPath};
pub use path::Path2D;
pub use point::{Point2D, Point3D};
pub use polygon::Polygon2D;
pub use triangle::Triangle;
