//! Entity resolution: one node per real-world entity.
//!
//! Rows from different tables name the same teacher, course or programme
//! in slightly different ways. The registry normalizes keys, mints one
//! deterministic IRI per entity and remembers the class it was given.

use std::collections::HashMap;

use campusgraph_core::types::local_name;
use campusgraph_core::{Class, Namespace};
use campusgraph_graph::NodeRef;

use crate::fields::{code, normalize};

/// A kind of entity, each with its own IRI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Person,
    Teacher,
    Course,
    CourseInstance,
    Program,
    Department,
    Division,
    CurriculumEntry,
    Registration,
    AssignedHours,
    ReportedHours,
}

impl Family {
    /// Local-name prefix of every node in this family.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Teacher => "teacher",
            Self::Course => "course",
            Self::CourseInstance => "courseInstance",
            Self::Program => "program",
            Self::Department => "department",
            Self::Division => "division",
            Self::CurriculumEntry => "curriculum",
            Self::Registration => "registration",
            Self::AssignedHours => "assignedHours",
            Self::ReportedHours => "reportedHours",
        }
    }

    fn normalize_key(&self, raw: &str) -> String {
        match self {
            Self::Course | Self::Program => code(raw),
            _ => normalize(raw),
        }
    }
}

/// Result of declaring an entity.
#[derive(Debug, Clone)]
pub struct Declared {
    pub node: NodeRef,
    pub is_new: bool,
}

/// A key was declared again with a class unrelated to the one it holds.
#[derive(Debug, Clone)]
pub struct KindClash {
    /// The node as it stands; its class is unchanged.
    pub kept: NodeRef,
    pub requested: Class,
}

pub struct EntityRegistry {
    ns: Namespace,
    entities: HashMap<(Family, Vec<String>), NodeRef>,
    /// Lower-cased programme name to programme code.
    program_aliases: HashMap<String, String>,
}

impl EntityRegistry {
    pub fn new(ns: Namespace) -> Self {
        Self {
            ns,
            entities: HashMap::new(),
            program_aliases: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    fn key(family: Family, parts: &[&str]) -> (Family, Vec<String>) {
        let parts = parts.iter().map(|p| family.normalize_key(p)).collect();
        (family, parts)
    }

    /// Declare (or re-find) the entity identified by `parts`.
    ///
    /// A known entity declared with one of its superclasses is returned
    /// unchanged; declared with a subclass it is refined.
    pub fn declare(
        &mut self,
        family: Family,
        parts: &[&str],
        class: Class,
    ) -> Result<Declared, KindClash> {
        let key = Self::key(family, parts);

        if let Some(node) = self.entities.get_mut(&key) {
            if node.class.is_a(class) {
                return Ok(Declared {
                    node: node.clone(),
                    is_new: false,
                });
            }
            if class.is_a(node.class) {
                node.class = class;
                return Ok(Declared {
                    node: node.clone(),
                    is_new: false,
                });
            }
            return Err(KindClash {
                kept: node.clone(),
                requested: class,
            });
        }

        let refs: Vec<&str> = key.1.iter().map(String::as_str).collect();
        let iri = self.ns.iri(&local_name(family.prefix(), &refs));
        let node = NodeRef::new(iri, class);
        self.entities.insert(key, node.clone());
        Ok(Declared { node, is_new: true })
    }

    pub fn lookup(&self, family: Family, parts: &[&str]) -> Option<&NodeRef> {
        self.entities.get(&Self::key(family, parts))
    }

    /// Find a person by id, trying the families in the given order.
    pub fn resolve_person(&self, id: &str, order: [Family; 2]) -> Option<(Family, &NodeRef)> {
        order
            .into_iter()
            .find_map(|family| self.lookup(family, &[id]).map(|node| (family, node)))
    }

    /// Record that a programme is also known by `name`.
    ///
    /// Returns the previously aliased code if the name already points at a
    /// different programme; the first alias is kept.
    pub fn alias_program(&mut self, name: &str, program_code: &str) -> Result<(), String> {
        let alias = normalize(name).to_lowercase();
        let target = code(program_code);
        match self.program_aliases.get(&alias) {
            Some(existing) if *existing != target => Err(existing.clone()),
            Some(_) => Ok(()),
            None => {
                self.program_aliases.insert(alias, target);
                Ok(())
            }
        }
    }

    /// Canonical programme code for a value that is either a code or a
    /// programme name.
    pub fn resolve_program(&self, raw: &str) -> String {
        let as_code = code(raw);
        if self.lookup(Family::Program, &[&as_code]).is_some() {
            return as_code;
        }
        self.program_aliases
            .get(&normalize(raw).to_lowercase())
            .cloned()
            .unwrap_or(as_code)
    }

    /// Known entities of one family, sorted by key.
    pub fn entities_of(&self, family: Family) -> Vec<(&[String], &NodeRef)> {
        let mut found: Vec<(&[String], &NodeRef)> = self
            .entities
            .iter()
            .filter(|((f, _), _)| *f == family)
            .map(|((_, parts), node)| (parts.as_slice(), node))
            .collect();
        found.sort_by(|a, b| a.0.cmp(b.0));
        found
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
