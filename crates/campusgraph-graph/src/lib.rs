//! campusgraph-graph: the in-memory knowledge graph and its writers.
//!
//! This crate is the single mutation point for the output graph. Every
//! write goes through [`Graph`], which checks the vocabulary's domain,
//! range and functionality rules, so a finished graph conforms to the
//! ontology by construction.

pub mod format;
pub mod mutations;
pub mod ntriples;
pub mod queries;
pub mod rdfxml;
pub mod store;
pub mod turtle;

pub use format::OutputFormat;
pub use mutations::Assertion;
pub use queries::GraphStats;
pub use store::{Graph, GraphError, NodeRef};
