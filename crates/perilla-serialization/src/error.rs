//! Error type for the serialization codec.

use perilla_document::DocumentError;
use thiserror::Error;

/// Errors raised while decoding a parameter or group record.
///
/// All variants are structural: they abort the decode of the current record
/// and the caller must discard the partially-populated snapshot. The
/// non-fatal class — unknown names in a `Props`-style flag list — never
/// reaches this type; those are logged and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// The document failed a required shape check.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A field belonging to one extra-data kind arrived while a different
    /// kind was already live on the parameter.
    #[error("extra data already holds {found} while {requested} was requested")]
    ExtraDataMismatch {
        /// The kind the field being decoded belongs to.
        requested: &'static str,
        /// The kind already attached to the parameter.
        found: &'static str,
    },
}

impl SerializationError {
    /// Create an [`SerializationError::ExtraDataMismatch`] error.
    pub fn extra_data_mismatch(requested: &'static str, found: &'static str) -> Self {
        SerializationError::ExtraDataMismatch { requested, found }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_errors_convert_transparently() {
        let err: SerializationError = DocumentError::missing_field("ScriptName").into();
        assert_eq!(err.to_string(), "missing required field 'ScriptName'");
    }

    #[test]
    fn extra_data_mismatch_display() {
        let err = SerializationError::extra_data_mismatch("ValueRange", "Choice");
        assert_eq!(
            err.to_string(),
            "extra data already holds Choice while ValueRange was requested"
        );
    }
}
