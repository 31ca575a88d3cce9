//! Core data model for the Millwright CAM pipeline.
//!
//! This crate has no knowledge of SVG, STL, or G-code formats; it holds the
//! value types shared by every pipeline stage (geometry primitives, tool and
//! machine configuration records, unit conversion, and the error taxonomy).

pub mod config;
pub mod error;
pub mod geom;
pub mod tool;
pub mod units;

pub use config::{
    CNConfig, CutoutMode, CutoutParams, GCodeOptions, OffsetDirection, ToolpathPoint,
    ValidationReport,
};
pub use error::{Error, InputError, Result};
pub use geom::{
    BoundingBox2D, BoundingBox3D, CurveSegment, Path2D, Point2D, Point3D, Polygon2D,
    PrecisionPath, Triangle,
};
pub use tool::{Tool, ToolCoating, ToolId, ToolMaterial, ToolRegistry, ToolType};
pub use units::MeasurementSystem;

/// Epsilon used for point equality and closure tests throughout the pipeline.
pub const EPSILON: f64 = 1e-6;
