//! Graph storage and shared graph error type.

use std::collections::{BTreeSet, HashMap};

use campusgraph_core::{Class, Iri, Namespace, Term, Triple};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Node {node} has not been declared")]
    UndeclaredNode { node: Iri },

    #[error("Node {node} is a {existing:?} and cannot be redeclared as {requested:?}")]
    ClassClash {
        node: Iri,
        existing: Class,
        requested: Class,
    },

    #[error("{property} expects a {expected:?} subject, {node} is a {actual:?}")]
    DomainViolation {
        node: Iri,
        property: String,
        expected: Class,
        actual: Class,
    },

    #[error("{property} expects a {expected:?} object, {node} is a {actual:?}")]
    RangeViolation {
        node: Iri,
        property: String,
        expected: Class,
        actual: Class,
    },

    #[error("{property} expects xsd:{expected}, got xsd:{actual}")]
    DatatypeMismatch {
        property: String,
        expected: String,
        actual: String,
    },

    #[error("{subject} {property} is already {kept:?}, refusing {rejected:?}")]
    Conflict {
        subject: Iri,
        property: String,
        kept: Term,
        rejected: Term,
    },

    #[error("Cannot serialize: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// A handle on a node: its IRI and the class it was minted as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub iri: Iri,
    pub class: Class,
}

impl NodeRef {
    pub fn new(iri: Iri, class: Class) -> Self {
        Self { iri, class }
    }
}

/// The output knowledge graph.
///
/// Triples live in a sorted set, so duplicates collapse and iteration
/// order depends only on content, never on insertion order.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) ns: Namespace,
    pub(crate) triples: BTreeSet<Triple>,
    /// Current class of every declared node.
    pub(crate) classes: HashMap<Iri, Class>,
    /// Value held by each (subject, functional predicate) pair.
    pub(crate) functional: HashMap<(Iri, Iri), Term>,
}

impl Graph {
    pub fn new(ns: Namespace) -> Self {
        Self {
            ns,
            triples: BTreeSet::new(),
            classes: HashMap::new(),
            functional: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    /// Insert a triple, returning whether it was new.
    pub(crate) fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }
}
