//! Write operations for the knowledge graph.
//!
//! All mutations are idempotent: asserting a triple that already exists is
//! a no-op. Functional properties accept one value per subject; a second,
//! different value is rejected with [`GraphError::Conflict`] and the graph
//! keeps the first.

use campusgraph_core::vocab::schema_triples;
use campusgraph_core::{Class, DatatypeProperty, Iri, Literal, ObjectProperty, Term, Triple};

use crate::store::{Graph, GraphError, NodeRef, Result};

/// Outcome of a successful assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    Added,
    Existing,
}

impl Graph {
    // ── Nodes ────────────────────────────────────────────────────

    /// Declare a node and assert its `rdf:type`s.
    ///
    /// Redeclaring a node with a subclass of its current class refines it
    /// (a `Person` stub becomes a `Student`). Redeclaring with a superclass
    /// is a no-op. Any other class change is a [`GraphError::ClassClash`].
    pub fn declare(&mut self, node: &NodeRef) -> Result<Assertion> {
        match self.classes.get(&node.iri).copied() {
            Some(existing) if existing.is_a(node.class) => return Ok(Assertion::Existing),
            Some(existing) if !node.class.is_a(existing) => {
                return Err(GraphError::ClassClash {
                    node: node.iri.clone(),
                    existing,
                    requested: node.class,
                });
            }
            _ => {}
        }

        self.classes.insert(node.iri.clone(), node.class);
        for class in node.class.asserted_types() {
            let class_iri = class.iri(&self.ns);
            self.insert(Triple::new(node.iri.clone(), Iri::rdf_type(), class_iri));
        }

        Ok(Assertion::Added)
    }

    // ── Properties ───────────────────────────────────────────────

    /// Attach a literal value to a declared node.
    pub fn set_literal(
        &mut self,
        node: &NodeRef,
        property: DatatypeProperty,
        value: Literal,
    ) -> Result<Assertion> {
        let class = self.declared_class(&node.iri)?;
        let name = property.local_name();

        if !class.is_a(property.domain()) {
            return Err(GraphError::DomainViolation {
                node: node.iri.clone(),
                property: name.to_string(),
                expected: property.domain(),
                actual: class,
            });
        }
        if value.datatype != property.datatype() {
            return Err(GraphError::DatatypeMismatch {
                property: name.to_string(),
                expected: property.datatype().local_name().to_string(),
                actual: value.datatype.local_name().to_string(),
            });
        }

        let predicate = property.iri(&self.ns);
        self.assert(
            node.iri.clone(),
            predicate,
            Term::Literal(value),
            property.is_functional(),
        )
    }

    /// Link two declared nodes with an object property.
    pub fn link(
        &mut self,
        subject: &NodeRef,
        property: ObjectProperty,
        object: &NodeRef,
    ) -> Result<Assertion> {
        let subject_class = self.declared_class(&subject.iri)?;
        let object_class = self.declared_class(&object.iri)?;
        let name = property.local_name();

        if !subject_class.is_a(property.domain()) {
            return Err(GraphError::DomainViolation {
                node: subject.iri.clone(),
                property: name.to_string(),
                expected: property.domain(),
                actual: subject_class,
            });
        }
        if !object_class.is_a(property.range()) {
            return Err(GraphError::RangeViolation {
                node: object.iri.clone(),
                property: name.to_string(),
                expected: property.range(),
                actual: object_class,
            });
        }

        let predicate = property.iri(&self.ns);
        self.assert(
            subject.iri.clone(),
            predicate,
            Term::Iri(object.iri.clone()),
            property.is_functional(),
        )
    }

    /// Insert the vocabulary's own OWL/RDFS declarations.
    pub fn add_schema(&mut self) -> usize {
        let before = self.triples.len();
        for triple in schema_triples(&self.ns) {
            self.insert(triple);
        }
        let added = self.triples.len() - before;
        tracing::debug!(added, "Added vocabulary schema");
        added
    }

    fn declared_class(&self, iri: &Iri) -> Result<Class> {
        self.classes
            .get(iri)
            .copied()
            .ok_or_else(|| GraphError::UndeclaredNode { node: iri.clone() })
    }

    fn assert(
        &mut self,
        subject: Iri,
        predicate: Iri,
        object: Term,
        functional: bool,
    ) -> Result<Assertion> {
        if functional {
            let key = (subject.clone(), predicate.clone());
            match self.functional.get(&key) {
                Some(kept) if *kept == object => return Ok(Assertion::Existing),
                Some(kept) => {
                    let property = self
                        .ns
                        .local(&predicate)
                        .unwrap_or(predicate.as_str())
                        .to_string();
                    return Err(GraphError::Conflict {
                        subject,
                        property,
                        kept: kept.clone(),
                        rejected: object,
                    });
                }
                None => {
                    self.functional.insert(key, object.clone());
                }
            }
        }

        if self.insert(Triple::new(subject, predicate, object)) {
            Ok(Assertion::Added)
        } else {
            Ok(Assertion::Existing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusgraph_core::Namespace;

    fn node(graph: &Graph, local: &str, class: Class) -> NodeRef {
        NodeRef::new(graph.namespace().iri(local), class)
    }

    #[test]
    fn declare_asserts_types_once() {
        let mut graph = Graph::new(Namespace::default());
        let student = node(&graph, "person_s1", Class::Student);

        assert_eq!(graph.declare(&student).unwrap(), Assertion::Added);
        assert_eq!(graph.declare(&student).unwrap(), Assertion::Existing);
        assert_eq!(graph.len(), 2); // Person + Student
    }

    #[test]
    fn declare_refines_to_subclass() {
        let mut graph = Graph::new(Namespace::default());
        let stub = node(&graph, "person_s1", Class::Person);
        graph.declare(&stub).unwrap();

        let ta = node(&graph, "person_s1", Class::TeachingAssistant);
        assert_eq!(graph.declare(&ta).unwrap(), Assertion::Added);
        assert_eq!(graph.class_of(&ta.iri), Some(Class::TeachingAssistant));

        // A superclass redeclaration changes nothing.
        assert_eq!(graph.declare(&stub).unwrap(), Assertion::Existing);
        assert_eq!(graph.class_of(&ta.iri), Some(Class::TeachingAssistant));
    }

    #[test]
    fn declare_rejects_unrelated_class() {
        let mut graph = Graph::new(Namespace::default());
        graph.declare(&node(&graph, "x", Class::Course)).unwrap();
        let err = graph.declare(&node(&graph, "x", Class::Program)).unwrap_err();
        assert!(matches!(err, GraphError::ClassClash { .. }));
    }

    #[test]
    fn literal_requires_declared_node() {
        let mut graph = Graph::new(Namespace::default());
        let course = node(&graph, "course_X", Class::Course);
        let err = graph
            .set_literal(&course, DatatypeProperty::CourseCode, Literal::string("X"))
            .unwrap_err();
        assert!(matches!(err, GraphError::UndeclaredNode { .. }));
    }

    #[test]
    fn literal_checks_domain_and_datatype() {
        let mut graph = Graph::new(Namespace::default());
        let course = node(&graph, "course_X", Class::Course);
        graph.declare(&course).unwrap();

        let err = graph
            .set_literal(&course, DatatypeProperty::PersonId, Literal::string("X"))
            .unwrap_err();
        assert!(matches!(err, GraphError::DomainViolation { .. }));

        let err = graph
            .set_literal(&course, DatatypeProperty::CourseCode, Literal::int(1))
            .unwrap_err();
        assert!(matches!(err, GraphError::DatatypeMismatch { .. }));
    }

    #[test]
    fn functional_literal_conflict_keeps_first() {
        let mut graph = Graph::new(Namespace::default());
        let course = node(&graph, "course_X", Class::Course);
        graph.declare(&course).unwrap();

        graph
            .set_literal(&course, DatatypeProperty::CourseName, Literal::string("Logic"))
            .unwrap();
        assert_eq!(
            graph
                .set_literal(&course, DatatypeProperty::CourseName, Literal::string("Logic"))
                .unwrap(),
            Assertion::Existing
        );

        let err = graph
            .set_literal(&course, DatatypeProperty::CourseName, Literal::string("Sets"))
            .unwrap_err();
        match err {
            GraphError::Conflict { property, kept, .. } => {
                assert_eq!(property, "courseName");
                assert_eq!(kept, Term::Literal(Literal::string("Logic")));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            graph.literal(&course.iri, DatatypeProperty::CourseName),
            Some(&Literal::string("Logic"))
        );
    }

    #[test]
    fn link_checks_range_with_subclasses() {
        let mut graph = Graph::new(Namespace::default());
        let reg = node(&graph, "registration_a_b", Class::Registration);
        let ta = node(&graph, "person_b", Class::TeachingAssistant);
        let course = node(&graph, "course_c", Class::Course);
        for n in [&reg, &ta, &course] {
            graph.declare(n).unwrap();
        }

        // TeachingAssistant ⊑ Person satisfies the range.
        graph
            .link(&reg, ObjectProperty::RegisteredStudent, &ta)
            .unwrap();

        let err = graph
            .link(&reg, ObjectProperty::RegisteredInstance, &course)
            .unwrap_err();
        assert!(matches!(err, GraphError::RangeViolation { .. }));
    }

    #[test]
    fn multi_valued_link_accepts_many_objects() {
        let mut graph = Graph::new(Namespace::default());
        let program = node(&graph, "program_A", Class::Program);
        let c1 = node(&graph, "course_1", Class::Course);
        let c2 = node(&graph, "course_2", Class::Course);
        for n in [&program, &c1, &c2] {
            graph.declare(n).unwrap();
        }

        graph.link(&program, ObjectProperty::IncludesCourse, &c1).unwrap();
        graph.link(&program, ObjectProperty::IncludesCourse, &c2).unwrap();
        assert_eq!(
            graph.linked(&program.iri, ObjectProperty::IncludesCourse).len(),
            2
        );
    }

    #[test]
    fn schema_is_added_once() {
        let mut graph = Graph::new(Namespace::default());
        let first = graph.add_schema();
        assert!(first > 0);
        assert_eq!(graph.add_schema(), 0);
    }
}
