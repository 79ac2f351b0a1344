//! campusgraph-convert: university tables to an ontology-conformant graph.
//!
//! Loads the course, staff, programme and student tables, resolves the
//! records that describe the same real-world entity onto one node, derives
//! the relationships the tables only imply, and writes the graph out.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fields;
pub mod manifest;
pub mod mapping;
pub mod persist;
pub mod pipeline;
pub mod records;
pub mod resolve;
pub mod tables;
