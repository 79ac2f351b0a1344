use thiserror::Error;

/// Errors raised while constructing core values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid namespace IRI {iri:?}: {reason}")]
    InvalidNamespace { iri: String, reason: String },

    #[error("Invalid decimal literal: {0:?}")]
    InvalidDecimal(String),
}
