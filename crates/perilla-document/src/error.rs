//! Error type for structural document violations.

use thiserror::Error;

/// Errors raised when a document fails a required shape check.
///
/// These are the fatal class of decode errors: a wrong node kind, a wrong
/// sequence length or a missing required field aborts the decode of the
/// current record. Unknown property names are *not* represented here; those
/// are logged and skipped by the codecs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A map node was required but something else was found.
    #[error("expected a map node for {context}")]
    NotAMap {
        /// What the map was supposed to hold.
        context: String,
    },

    /// A sequence node was required but something else was found.
    #[error("expected a sequence node for {context}")]
    NotASequence {
        /// What the sequence was supposed to hold.
        context: String,
    },

    /// A required field is absent from a map.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Name of the absent field.
        field: String,
    },

    /// A scalar could not be read with the requested type.
    #[error("expected a {expected} scalar for {context}")]
    BadScalar {
        /// What the scalar was supposed to hold.
        context: String,
        /// The scalar type that was requested.
        expected: &'static str,
    },

    /// A sequence has the wrong number of elements.
    #[error("wrong element count for {context}: expected {expected}, got {actual}")]
    BadArity {
        /// What the sequence was supposed to hold.
        context: String,
        /// Human-readable description of the accepted lengths.
        expected: &'static str,
        /// The length that was found.
        actual: usize,
    },

    /// The document text could not be parsed.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The document tree could not be emitted as text.
    #[error("failed to emit document: {0}")]
    Emit(String),
}

impl DocumentError {
    /// Create a [`DocumentError::NotAMap`] error.
    pub fn not_a_map(context: impl Into<String>) -> Self {
        DocumentError::NotAMap {
            context: context.into(),
        }
    }

    /// Create a [`DocumentError::NotASequence`] error.
    pub fn not_a_sequence(context: impl Into<String>) -> Self {
        DocumentError::NotASequence {
            context: context.into(),
        }
    }

    /// Create a [`DocumentError::MissingField`] error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        DocumentError::MissingField {
            field: field.into(),
        }
    }

    /// Create a [`DocumentError::BadScalar`] error.
    pub fn bad_scalar(context: impl Into<String>, expected: &'static str) -> Self {
        DocumentError::BadScalar {
            context: context.into(),
            expected,
        }
    }

    /// Create a [`DocumentError::BadArity`] error.
    pub fn bad_arity(context: impl Into<String>, expected: &'static str, actual: usize) -> Self {
        DocumentError::BadArity {
            context: context.into(),
            expected,
            actual,
        }
    }
}
