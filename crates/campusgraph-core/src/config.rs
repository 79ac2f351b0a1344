//! Namespace configuration for minted IRIs.
//!
//! Every node and vocabulary term lives under a single base IRI so the
//! output lines up with the ontology document it is loaded next to.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Iri;

/// Base IRI of the university ontology.
pub const DEFAULT_BASE_IRI: &str =
    "http://www.semanticweb.org/anton/ontologies/2025/3/Assignment2/";

/// The namespace all minted IRIs are built in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Namespace {
    base: String,
}

impl Namespace {
    /// Validate and wrap a base IRI. The base must end in `/` or `#` so
    /// that appended local names form well-shaped IRIs.
    pub fn new(base: impl Into<String>) -> Result<Self, CoreError> {
        let base = base.into();
        let invalid = |reason: &str| CoreError::InvalidNamespace {
            iri: base.clone(),
            reason: reason.to_string(),
        };

        if !base.contains(':') {
            return Err(invalid("missing scheme"));
        }
        if base.chars().any(|c| {
            c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
        }) {
            return Err(invalid("contains characters not allowed in an IRI"));
        }
        if !(base.ends_with('/') || base.ends_with('#')) {
            return Err(invalid("must end with '/' or '#'"));
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Build the IRI for a local name in this namespace.
    pub fn iri(&self, local: &str) -> Iri {
        Iri(format!("{}{}", self.base, local))
    }

    /// Strip the base from an IRI, returning the local part if it belongs here.
    pub fn local<'a>(&self, iri: &'a Iri) -> Option<&'a str> {
        iri.as_str().strip_prefix(self.base.as_str())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_IRI.to_string(),
        }
    }
}
