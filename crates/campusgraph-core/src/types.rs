//! RDF term types for the campus knowledge graph.
//!
//! Terms are plain owned strings. Triples are totally ordered so a graph
//! can keep them in a sorted set and serialize deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";

/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

// ── IRIs ──────────────────────────────────────────────────────────

/// An absolute IRI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(pub String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rdf_type() -> Self {
        Self(RDF_TYPE.to_string())
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Literals ──────────────────────────────────────────────────────

/// The XSD datatypes the vocabulary uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    String,
    Int,
    Decimal,
    Boolean,
}

impl Datatype {
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
        }
    }

    pub fn iri(&self) -> Iri {
        Iri(format!("{XSD_NS}{}", self.local_name()))
    }
}

/// A typed literal in canonical lexical form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Datatype,
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: Datatype::String,
        }
    }

    pub fn int(value: i64) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: Datatype::Int,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: Datatype::Boolean,
        }
    }

    /// Parse a decimal such as `7.5`, `-3` or `07.50` into canonical form
    /// (`7.5`, `-3.0`, `7.5`). Exponents are rejected.
    pub fn decimal(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidDecimal(raw.to_string());
        let trimmed = raw.trim();

        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let int_part = int_part.trim_start_matches('0');
        let frac_part = frac_part.trim_end_matches('0');
        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let frac_part = if frac_part.is_empty() { "0" } else { frac_part };

        let is_zero = int_part == "0" && frac_part == "0";
        let sign = if negative && !is_zero { "-" } else { "" };

        Ok(Self {
            lexical: format!("{sign}{int_part}.{frac_part}"),
            datatype: Datatype::Decimal,
        })
    }
}

// ── Terms and triples ─────────────────────────────────────────────

/// The object position of a triple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
}

impl Term {
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Iri(_) => None,
            Term::Literal(lit) => Some(lit),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// A single statement. Subjects are never blank nodes in this graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

// ── Local names ───────────────────────────────────────────────────

/// Mint a node local name `{prefix}_{part}_{part}…`.
///
/// Each part is percent-encoded outside `[A-Za-z0-9-]`, underscores
/// included, so distinct part lists never produce the same name and the
/// result is a valid Turtle local name.
pub fn local_name(prefix: &str, parts: &[&str]) -> String {
    let mut name = String::from(prefix);
    for part in parts {
        name.push('_');
        encode_component(part, &mut name);
    }
    name
}

fn encode_component(part: &str, out: &mut String) {
    for byte in part.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_canonical_forms() {
        assert_eq!(Literal::decimal("7.5").unwrap().lexical, "7.5");
        assert_eq!(Literal::decimal("07.50").unwrap().lexical, "7.5");
        assert_eq!(Literal::decimal("15").unwrap().lexical, "15.0");
        assert_eq!(Literal::decimal("-3").unwrap().lexical, "-3.0");
        assert_eq!(Literal::decimal(".5").unwrap().lexical, "0.5");
        assert_eq!(Literal::decimal("-0.0").unwrap().lexical, "0.0");
    }

    #[test]
    fn decimal_rejects_garbage() {
        assert!(Literal::decimal("").is_err());
        assert!(Literal::decimal(".").is_err());
        assert!(Literal::decimal("1e3").is_err());
        assert!(Literal::decimal("7,5").is_err());
        assert!(Literal::decimal("abc").is_err());
    }

    #[test]
    fn local_names_encode_unsafe_characters() {
        assert_eq!(local_name("course", &["DD2421"]), "course_DD2421");
        assert_eq!(
            local_name("department", &["Computer Science"]),
            "department_Computer%20Science"
        );
        assert_eq!(local_name("courseInstance", &["a.b"]), "courseInstance_a%2Eb");
    }

    #[test]
    fn local_names_are_injective_across_parts() {
        let a = local_name("registration", &["x_y", "z"]);
        let b = local_name("registration", &["x", "y_z"]);
        assert_ne!(a, b);
    }

    #[test]
    fn non_ascii_is_percent_encoded_per_byte() {
        assert_eq!(local_name("division", &["Å"]), "division_%C3%85");
    }

    #[test]
    fn triples_order_by_subject_first() {
        let a = Triple::new(Iri::new("http://x/a"), Iri::rdf_type(), Iri::new("http://x/Z"));
        let b = Triple::new(Iri::new("http://x/b"), Iri::rdf_type(), Iri::new("http://x/A"));
        assert!(a < b);
    }
}
