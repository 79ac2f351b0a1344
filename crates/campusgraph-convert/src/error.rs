//! Error types for the campusgraph-convert crate.

use campusgraph_core::Issue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Required table {table} not found ({origin})")]
    MissingTable { table: String, origin: String },

    #[error("Table {table} has no column {column:?}")]
    MissingColumn { table: String, column: String },

    #[error("Failed to parse table {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("Strict mode: {0}")]
    Strict(Box<Issue>),

    #[error("Graph error: {0}")]
    Graph(#[from] campusgraph_graph::GraphError),

    #[error("Invalid value: {0}")]
    Core(#[from] campusgraph_core::CoreError),

    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
