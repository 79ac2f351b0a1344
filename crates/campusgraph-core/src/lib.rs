//! campusgraph-core: vocabulary, RDF terms, and shared error types.
//!
//! This crate provides the foundations used across the campusgraph workspace:
//! - RDF terms (IRIs, typed literals, triples) and local-name minting
//! - The university ontology vocabulary (classes, properties, domain/range)
//! - Data-quality issue types reported during conversion
//! - Namespace configuration
//! - Common error types

pub mod config;
pub mod error;
pub mod issues;
pub mod types;
pub mod vocab;

pub use config::Namespace;
pub use error::CoreError;
pub use issues::Issue;
pub use types::{Datatype, Iri, Literal, Term, Triple};
pub use vocab::{Class, DatatypeProperty, ObjectProperty};
