//! Error taxonomy for the CAM pipeline, layered on top of
//! `millwright_core::error::InputError`.

use thiserror::Error;

/// Geometry-level failures: degenerate input, invalid polygons, offset
/// direction that cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("polygon has fewer than 3 vertices")]
    InvalidPolygon,

    #[error("degenerate triangle skipped")]
    DegenerateTriangle,

    #[error("cannot resolve 'auto' offset direction for an open path")]
    AmbiguousOffsetDirection,

    #[error("boolean operation produced no output")]
    EmptyBooleanResult,
}

/// Failures surfaced as `ValidationReport` errors (see §7's taxonomy);
/// these block G-code emission but are always captured in the aggregated
/// report rather than propagated as a bare `Result::Err` from the
/// top-level pipeline call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("design does not fit material: {0}")]
    MaterialFit(String),

    #[error("tool too large for feature: {0}")]
    ToolFeatureMismatch(String),

    #[error("mesh undercut detected: {0}")]
    MeshUndercut(String),

    #[error("no valid paths remained for emission")]
    NoPathsToEmit,
}

/// Resource-ceiling and I/O failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("{operation} exceeded iteration cap of {cap}")]
    IterationCapExceeded { operation: String, cap: u32 },

    #[error("I/O failure: {0}")]
    Io(String),
}

/// Unified error type for `millwright-cam`.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] millwright_core::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("input error: {0}")]
    Input(String),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            GeometryError::InvalidPolygon.to_string(),
            "polygon has fewer than 3 vertices"
        );
        assert_eq!(
            ResourceError::IterationCapExceeded {
                operation: "spiral".into(),
                cap: 1000
            }
            .to_string(),
            "spiral exceeded iteration cap of 1000"
        );
    }

    #[test]
    fn conversions_compose() {
        let e: Error = GeometryError::InvalidPolygon.into();
        assert!(matches!(e, Error::Geometry(_)));
    }
}
