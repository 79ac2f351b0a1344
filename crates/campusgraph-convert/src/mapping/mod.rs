//! Table-to-graph mapping.
//!
//! A [`Mapper`] owns the graph under construction, the entity registry and
//! the issue log. Each table has a `map_*` pass in a submodule; the passes
//! must run in the order [`crate::pipeline`] calls them, since later
//! tables refer to entities earlier tables describe.

mod derive;
mod hours;
mod offerings;
mod organisation;
mod people;

use std::collections::{BTreeMap, HashMap, HashSet};

use campusgraph_core::issues::Location;
use campusgraph_core::{
    Class, DatatypeProperty, Iri, Issue, Literal, Namespace, ObjectProperty, Term,
};
use campusgraph_graph::{Graph, GraphError, NodeRef};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::fields::{FieldError, FieldResult};
use crate::resolve::{Declared, EntityRegistry, Family};
use crate::tables::TableName;

pub struct Mapper {
    graph: Graph,
    registry: EntityRegistry,
    diagnostics: Diagnostics,
    /// Tables that were present in this run.
    loaded: HashSet<TableName>,
    /// Nodes described by a row of their own table, as opposed to stubs.
    described: HashSet<Iri>,
    /// Division key to the department it first appeared with.
    division_departments: BTreeMap<String, String>,
    /// Course instance id to its course code.
    instance_courses: HashMap<String, String>,
}

impl Mapper {
    pub fn new(ns: Namespace, strict: bool) -> Self {
        Self {
            graph: Graph::new(ns.clone()),
            registry: EntityRegistry::new(ns),
            diagnostics: Diagnostics::new(strict),
            loaded: HashSet::new(),
            described: HashSet::new(),
            division_departments: BTreeMap::new(),
            instance_courses: HashMap::new(),
        }
    }

    /// Note that a table is part of this run. References into a loaded
    /// table that match none of its rows are reported as dangling.
    pub fn mark_loaded(&mut self, table: TableName) {
        self.loaded.insert(table);
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn issues(&self) -> &[Issue] {
        self.diagnostics.issues()
    }

    pub fn finish(self) -> (Graph, Vec<Issue>) {
        (self.graph, self.diagnostics.into_issues())
    }

    fn report(&mut self, issue: Issue) -> Result<()> {
        self.diagnostics.report(issue)
    }

    // ── Nodes ────────────────────────────────────────────────────

    /// Declare an entity in the registry and the graph.
    fn entity(
        &mut self,
        family: Family,
        parts: &[&str],
        class: Class,
        at: &Location,
    ) -> Result<Declared> {
        let declared = match self.registry.declare(family, parts, class) {
            Ok(declared) => declared,
            Err(clash) => {
                let key = self
                    .graph
                    .namespace()
                    .local(&clash.kept.iri)
                    .unwrap_or(clash.kept.iri.as_str())
                    .to_string();
                self.report(Issue::KindMismatch {
                    at: at.clone(),
                    key,
                    existing: clash.kept.class,
                    requested: clash.requested,
                })?;
                Declared {
                    node: clash.kept,
                    is_new: false,
                }
            }
        };
        self.graph.declare(&declared.node)?;
        Ok(declared)
    }

    /// Declare the entity a row of its own table describes.
    fn describe(
        &mut self,
        family: Family,
        key: &str,
        class: Class,
        at: &Location,
    ) -> Result<NodeRef> {
        let node = self.entity(family, &[key], class, at)?.node;
        if let Some(property) = key_property(family) {
            self.set(&node, property, Literal::string(key), at)?;
        }
        self.described.insert(node.iri.clone());
        Ok(node)
    }

    /// Resolve a reference from another table's row.
    ///
    /// The target is always declared with its key property, so an edge
    /// never points at an untyped node. A target its own table does not
    /// describe is reported as dangling.
    fn reference(
        &mut self,
        family: Family,
        key: &str,
        class: Class,
        column: &str,
        at: &Location,
    ) -> Result<NodeRef> {
        let node = self.entity(family, &[key], class, at)?.node;
        if let Some(property) = key_property(family) {
            self.set(&node, property, Literal::string(key), at)?;
        }

        let table_loaded = describing_table(family).is_some_and(|t| self.loaded.contains(&t));
        if table_loaded && !self.described.contains(&node.iri) {
            self.report(Issue::DanglingReference {
                at: at.clone(),
                column: column.to_string(),
                value: key.to_string(),
                resolved_as: node.iri.to_string(),
            })?;
        }
        Ok(node)
    }

    /// Resolve a person id, trying the families in order. Unknown ids
    /// become a stub in the first family.
    fn person_reference(
        &mut self,
        id: &str,
        order: [Family; 2],
        column: &str,
        at: &Location,
    ) -> Result<NodeRef> {
        let (family, class) = match self.registry.resolve_person(id, order) {
            Some((family, node)) => (family, node.class),
            None => (order[0], stub_class(order[0])),
        };
        self.reference(family, id, class, column, at)
    }

    /// Resolve a programme code or name to its node.
    fn program_reference(&mut self, raw: &str, column: &str, at: &Location) -> Result<NodeRef> {
        let program_code = self.registry.resolve_program(raw);
        self.reference(Family::Program, &program_code, Class::Program, column, at)
    }

    /// Register a programme name as an alias of its code. A name already
    /// aliased to another programme is a conflict; the first alias stays.
    fn alias_program(&mut self, program_code: &str, name: &str, at: &Location) -> Result<()> {
        if let Err(existing) = self.registry.alias_program(name, program_code) {
            self.report(Issue::Conflict {
                at: at.clone(),
                subject: name.to_string(),
                property: "programme alias".to_string(),
                kept: existing,
                rejected: program_code.to_string(),
            })?;
        }
        Ok(())
    }

    // ── Properties ───────────────────────────────────────────────

    /// Set a literal property. A conflicting value is reported and dropped.
    fn set(
        &mut self,
        node: &NodeRef,
        property: DatatypeProperty,
        value: Literal,
        at: &Location,
    ) -> Result<()> {
        match self.graph.set_literal(node, property, value) {
            Ok(_) => Ok(()),
            Err(err) => self.absorb_conflict(err, at),
        }
    }

    /// Link two nodes. A conflicting object is reported and dropped.
    fn link(
        &mut self,
        subject: &NodeRef,
        property: ObjectProperty,
        object: &NodeRef,
        at: &Location,
    ) -> Result<()> {
        match self.graph.link(subject, property, object) {
            Ok(_) => Ok(()),
            Err(err) => self.absorb_conflict(err, at),
        }
    }

    fn absorb_conflict(&mut self, err: GraphError, at: &Location) -> Result<()> {
        match err {
            GraphError::Conflict {
                subject,
                property,
                kept,
                rejected,
            } => self.report(Issue::Conflict {
                at: at.clone(),
                subject: subject.to_string(),
                property,
                kept: term_text(&kept),
                rejected: term_text(&rejected),
            }),
            other => Err(other.into()),
        }
    }

    // ── Fields ───────────────────────────────────────────────────

    /// Interpret a cell that must be present. Blank and invalid cells are
    /// reported and yield `None`.
    fn required<T>(
        &mut self,
        parsed: FieldResult<T>,
        raw: Option<&str>,
        column: &str,
        at: &Location,
    ) -> Result<Option<T>> {
        match parsed {
            Ok(value) => Ok(Some(value)),
            Err(FieldError::Missing) => {
                self.report(Issue::MissingValue {
                    at: at.clone(),
                    column: column.to_string(),
                })?;
                Ok(None)
            }
            Err(FieldError::Invalid { expected }) => {
                self.invalid(raw, column, expected, at)?;
                Ok(None)
            }
        }
    }

    /// Interpret a cell that may be blank. Only invalid cells are reported.
    fn optional<T>(
        &mut self,
        parsed: FieldResult<T>,
        raw: Option<&str>,
        column: &str,
        at: &Location,
    ) -> Result<Option<T>> {
        match parsed {
            Ok(value) => Ok(Some(value)),
            Err(FieldError::Missing) => Ok(None),
            Err(FieldError::Invalid { expected }) => {
                self.invalid(raw, column, expected, at)?;
                Ok(None)
            }
        }
    }

    fn invalid(
        &mut self,
        raw: Option<&str>,
        column: &str,
        expected: &str,
        at: &Location,
    ) -> Result<()> {
        self.report(Issue::InvalidValue {
            at: at.clone(),
            column: column.to_string(),
            value: raw.unwrap_or_default().to_string(),
            expected: expected.to_string(),
        })
    }
}

/// The literal property that carries an entity's key.
fn key_property(family: Family) -> Option<DatatypeProperty> {
    match family {
        Family::Person => Some(DatatypeProperty::PersonId),
        Family::Teacher => Some(DatatypeProperty::TeacherId),
        Family::Course => Some(DatatypeProperty::CourseCode),
        Family::CourseInstance => Some(DatatypeProperty::InstanceId),
        Family::Program => Some(DatatypeProperty::ProgramCode),
        Family::Department => Some(DatatypeProperty::DepartmentName),
        Family::Division => Some(DatatypeProperty::DivisionName),
        Family::CurriculumEntry
        | Family::Registration
        | Family::AssignedHours
        | Family::ReportedHours => None,
    }
}

/// The table whose rows describe entities of a family.
fn describing_table(family: Family) -> Option<TableName> {
    match family {
        Family::Person => Some(TableName::Students),
        Family::Teacher => Some(TableName::SeniorTeachers),
        Family::Course => Some(TableName::Courses),
        Family::CourseInstance => Some(TableName::CourseInstances),
        Family::Program => Some(TableName::Programmes),
        _ => None,
    }
}

fn stub_class(family: Family) -> Class {
    match family {
        Family::Teacher => Class::SeniorTeacher,
        Family::Course => Class::Course,
        Family::CourseInstance => Class::CourseInstance,
        Family::Program => Class::Program,
        Family::Department => Class::Department,
        Family::Division => Class::Division,
        _ => Class::Person,
    }
}

fn term_text(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.to_string(),
        Term::Literal(lit) => lit.lexical.clone(),
    }
}

fn location(table: TableName, row: usize) -> Location {
    Location::row(table.to_string(), row)
}
