//! Error types for the validation core.
//!
//! Every failure the store or a validator can raise is a variant of [`Error`].
//! Field-level variants name the offending dictionary and entry so the caller
//! can render either a one-line message or a full diagnostic.

use crate::object::ObjectRef;

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while resolving or validating an object graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A required entry is absent (or holds `null`).
    #[error("{dict}: required entry /{field} missing")]
    MissingRequiredField {
        /// Dictionary the entry belongs to
        dict: String,
        /// Entry key
        field: String,
    },

    /// An entry resolved to the wrong kind of object.
    #[error("{dict}: entry /{field} has wrong type: expected {expected}, found {found}")]
    TypeMismatch {
        /// Dictionary the entry belongs to
        dict: String,
        /// Entry key
        field: String,
        /// Expected object kind
        expected: String,
        /// Actual object kind
        found: String,
    },

    /// An entry has the right kind but an unacceptable value.
    #[error("{dict}: entry /{field} invalid: {reason}")]
    ConstraintViolation {
        /// Dictionary the entry belongs to
        dict: String,
        /// Entry key
        field: String,
        /// What was wrong with the value
        reason: String,
    },

    /// Referenced object is not registered in the cross-reference store
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(ObjectRef),

    /// Reference chain loops back on itself or is too long
    #[error("Reference cycle detected: object {0}")]
    ReferenceCycle(ObjectRef),

    /// Structural recursion went deeper than the configured bound
    #[error("Structure depth limit exceeded (max: {0})")]
    DepthExceeded(u32),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    UnexpectedType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Unsupported PDF version
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Invalid PDF structure (generic)
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// Report could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl Error {
    /// Short stable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingRequiredField { .. } => "missing-required-field",
            Error::TypeMismatch { .. } => "type-mismatch",
            Error::ConstraintViolation { .. } => "constraint-violation",
            Error::UnresolvedReference(_) => "unresolved-reference",
            Error::ReferenceCycle(_) => "reference-cycle",
            Error::DepthExceeded(_) => "depth-exceeded",
            Error::UnexpectedType { .. } => "unexpected-type",
            Error::UnsupportedVersion(_) => "unsupported-version",
            Error::InvalidPdf(_) => "invalid-pdf",
            Error::Serialization(_) => "serialization",
        }
    }

    pub(crate) fn missing(dict: &str, field: &str) -> Self {
        Error::MissingRequiredField {
            dict: dict.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn mismatch(dict: &str, field: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            dict: dict.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn violation(dict: &str, field: &str, reason: impl Into<String>) -> Self {
        Error::ConstraintViolation {
            dict: dict.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
