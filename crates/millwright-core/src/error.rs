//! Error taxonomy for the core data model.
//!
//! The pipeline crate (`millwright-cam`) layers its own `GeometryError`,
//! `ValidationError`, and `ResourceError` enums on top of this module's
//! `InputError`, following the same `thiserror`-per-concern pattern used
//! here.

use thiserror::Error;

/// Errors that occur loading or interpreting input records (tool registry
/// entries, config values) before any geometry processing begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A required field was missing from a parsed record.
    #[error("missing field '{0}'")]
    MissingField(String),

    /// A field's value could not be parsed as its expected type.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// Human-readable reason the value is invalid.
        reason: String,
    },

    /// The input was empty where at least one record was required.
    #[error("empty input: {0}")]
    Empty(String),

    /// A mesh with zero triangles was passed where geometry was expected.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// An unknown enum discriminant was encountered.
    #[error("unknown {kind} discriminant: {value}")]
    UnknownDiscriminant {
        /// Name of the enum being decoded.
        kind: String,
        /// The unrecognized raw value.
        value: String,
    },
}

/// Unified error type for `millwright-core`.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// An input parsing error.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Generic error carrying a free-text message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an [`Error::Other`] from any displayable message.
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_display() {
        let err = InputError::MissingField("diameter".into());
        assert_eq!(err.to_string(), "missing field 'diameter'");

        let err = InputError::InvalidValue {
            field: "feed_rate".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for 'feed_rate': must be positive"
        );
    }

    #[test]
    fn error_conversion() {
        let input_err = InputError::Empty("tool registry".into());
        let err: Error = input_err.into();
        assert!(matches!(err, Error::Input(_)));
    }
}
