//! Output format selection.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{Graph, GraphError, Result};
use crate::{ntriples, rdfxml, turtle};

/// The serializations the converter can produce.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Turtle,
    NTriples,
    RdfXml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
            Self::RdfXml => "rdf",
        }
    }

    /// Whether a verbatim ontology document can be prepended.
    pub fn supports_preamble(&self) -> bool {
        matches!(self, Self::Turtle)
    }

    /// Serialize `graph`. The preamble is only honoured for Turtle.
    pub fn write<W: Write>(&self, graph: &Graph, writer: W, preamble: Option<&str>) -> Result<()> {
        match self {
            Self::Turtle => turtle::write(graph, writer, preamble),
            Self::NTriples => ntriples::write(graph, writer),
            Self::RdfXml => rdfxml::write(graph, writer),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Turtle => "turtle",
            Self::NTriples => "ntriples",
            Self::RdfXml => "rdfxml",
        };
        write!(f, "{name}")
    }
}

impl FromStr for OutputFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "ntriples" | "nt" => Ok(Self::NTriples),
            "rdfxml" | "rdf" | "xml" => Ok(Self::RdfXml),
            _ => Err(GraphError::Serialize(format!(
                "unknown format {s:?}; choose turtle, ntriples or rdfxml"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_extensions() {
        assert_eq!("TTL".parse::<OutputFormat>().unwrap(), OutputFormat::Turtle);
        assert_eq!("nt".parse::<OutputFormat>().unwrap(), OutputFormat::NTriples);
        assert_eq!("rdfxml".parse::<OutputFormat>().unwrap(), OutputFormat::RdfXml);
        assert!("json-ld".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for format in [OutputFormat::Turtle, OutputFormat::NTriples, OutputFormat::RdfXml] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn serde_names_are_lowercase() {
        let json = serde_json::to_string(&OutputFormat::RdfXml).unwrap();
        assert_eq!(json, "\"rdfxml\"");
    }
}
