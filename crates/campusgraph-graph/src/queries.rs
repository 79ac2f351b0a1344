//! Read operations for the knowledge graph.
//!
//! The converter never queries the graph to make decisions; these helpers
//! back the writers, run statistics and tests.

use std::collections::BTreeMap;

use serde::Serialize;

use campusgraph_core::{Class, DatatypeProperty, Iri, Literal, ObjectProperty, Term, Triple};

use crate::store::Graph;

/// Summary counts of a finished graph.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GraphStats {
    pub triples: usize,
    pub nodes: usize,
    /// Node count per declared class.
    pub per_class: BTreeMap<String, usize>,
}

impl Graph {
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// The class a node was declared (or last refined) as.
    pub fn class_of(&self, iri: &Iri) -> Option<Class> {
        self.classes.get(iri).copied()
    }

    /// All objects of `(subject, predicate, ?)` in sorted order.
    pub fn objects<'a>(&'a self, subject: &'a Iri, predicate: &'a Iri) -> Vec<&'a Term> {
        let lower = Triple::new(subject.clone(), predicate.clone(), Iri::new(String::new()));
        self.triples
            .range(lower..)
            .take_while(|t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
            .collect()
    }

    /// The `rdf:type`s asserted for a node.
    pub fn types_of(&self, subject: &Iri) -> Vec<&Iri> {
        let rdf_type = Iri::rdf_type();
        let lower = Triple::new(subject.clone(), rdf_type.clone(), Iri::new(String::new()));
        self.triples
            .range(lower..)
            .take_while(|t| &t.subject == subject && t.predicate == rdf_type)
            .filter_map(|t| t.object.as_iri())
            .collect()
    }

    /// The value of a datatype property, if set.
    pub fn literal(&self, subject: &Iri, property: DatatypeProperty) -> Option<&Literal> {
        let predicate = property.iri(&self.ns);
        self.functional
            .get(&(subject.clone(), predicate))
            .and_then(Term::as_literal)
    }

    /// Objects linked from a node through an object property.
    pub fn linked(&self, subject: &Iri, property: ObjectProperty) -> Vec<&Iri> {
        let predicate = property.iri(&self.ns);
        let lower = Triple::new(subject.clone(), predicate.clone(), Iri::new(String::new()));
        self.triples
            .range(lower..)
            .take_while(|t| &t.subject == subject && t.predicate == predicate)
            .filter_map(|t| t.object.as_iri())
            .collect()
    }

    /// Declared nodes whose class is `class` or one of its subclasses.
    pub fn nodes_of_class(&self, class: Class) -> Vec<&Iri> {
        let mut nodes: Vec<&Iri> = self
            .classes
            .iter()
            .filter(|(_, c)| c.is_a(class))
            .map(|(iri, _)| iri)
            .collect();
        nodes.sort();
        nodes
    }

    /// Distinct subjects in sorted order.
    pub fn subjects(&self) -> Vec<&Iri> {
        let mut subjects: Vec<&Iri> = Vec::new();
        for triple in &self.triples {
            if subjects.last() != Some(&&triple.subject) {
                subjects.push(&triple.subject);
            }
        }
        subjects
    }

    pub fn stats(&self) -> GraphStats {
        let mut per_class = BTreeMap::new();
        for class in self.classes.values() {
            *per_class.entry(class.local_name().to_string()).or_insert(0) += 1;
        }
        GraphStats {
            triples: self.triples.len(),
            nodes: self.classes.len(),
            per_class,
        }
    }
}
