//! Relationships no single row states.

use campusgraph_core::issues::Location;
use campusgraph_core::{Class, Issue, ObjectProperty};

use super::Mapper;
use crate::error::Result;
use crate::fields;
use crate::resolve::Family;

/// Location attached to issues raised by derivation.
const DERIVED: &str = "derived";

impl Mapper {
    /// Remember that a row named a division together with a department.
    /// The first pairing wins; a different later pairing is a conflict.
    pub(super) fn observe_division(
        &mut self,
        division: &str,
        department: &str,
        at: &Location,
    ) -> Result<()> {
        match self.division_departments.get(division) {
            Some(kept) if kept != department => {
                let kept = kept.clone();
                let subject = self
                    .registry
                    .lookup(Family::Division, &[division])
                    .map(|node| node.iri.to_string())
                    .unwrap_or_else(|| division.to_string());
                self.report(Issue::Conflict {
                    at: at.clone(),
                    subject,
                    property: ObjectProperty::BelongsTo.local_name().to_string(),
                    kept,
                    rejected: department.to_string(),
                })
            }
            Some(_) => Ok(()),
            None => {
                self.division_departments
                    .insert(division.to_string(), department.to_string());
                Ok(())
            }
        }
    }

    /// Link every division to its department.
    ///
    /// Co-occurrence in a row decides first; failing that, a division
    /// named `Department/Division` belongs to the department before the
    /// slash. Returns the number of divisions linked.
    pub fn derive_division_departments(&mut self) -> Result<usize> {
        let at = Location::derived(DERIVED);
        let divisions: Vec<(String, _)> = self
            .registry
            .entities_of(Family::Division)
            .into_iter()
            .map(|(parts, node)| (parts.join(" "), node.clone()))
            .collect();

        let mut linked = 0;
        for (key, division) in divisions {
            let department = self
                .division_departments
                .get(&key)
                .cloned()
                .or_else(|| department_from_name(&key));
            let Some(department) = department else {
                tracing::debug!(division = %key, "No department found for division");
                continue;
            };

            let department = self.describe(Family::Department, &department, Class::Department, &at)?;
            self.link(&division, ObjectProperty::BelongsTo, &department, &at)?;
            linked += 1;
        }
        Ok(linked)
    }
}

/// `"EECS/Robotics"` belongs to `"EECS"`.
fn department_from_name(division: &str) -> Option<String> {
    let (department, _) = division.split_once('/')?;
    fields::text(Some(department)).ok()
}

#[cfg(test)]
mod tests {
    use campusgraph_core::Namespace;

    use super::super::testing::rows;
    use super::*;
    use crate::tables::TableName;

    fn mapper() -> Mapper {
        Mapper::new(Namespace::new("http://example.org/uni/").unwrap(), false)
    }

    #[test]
    fn test_department_from_name() {
        assert_eq!(department_from_name("EECS/Robotics"), Some("EECS".to_string()));
        assert_eq!(department_from_name(" /Robotics"), None);
        assert_eq!(department_from_name("Robotics"), None);
    }

    #[test]
    fn test_co_occurrence_first_pairing_wins() {
        let mut m = mapper();
        m.mark_loaded(TableName::SeniorTeachers);
        m.map_senior_teachers(&rows(
            "Teacher id,Teacher name,Department name,Division name\n\
             t1,A,EECS,Robotics\n\
             t2,B,EECS,Robotics\n\
             t3,C,SCI,Robotics\n",
        ))
        .unwrap();
        assert_eq!(m.derive_division_departments().unwrap(), 1);

        let ns = m.graph().namespace().clone();
        assert_eq!(
            m.graph()
                .linked(&ns.iri("division_Robotics"), ObjectProperty::BelongsTo),
            vec![&ns.iri("department_EECS")]
        );
        assert!(matches!(
            m.issues(),
            [Issue::Conflict { kept, rejected, .. }] if kept == "EECS" && rejected == "SCI"
        ));
    }

    #[test]
    fn test_naming_convention_fallback() {
        let mut m = mapper();
        m.map_courses(&rows(
            "Course code,Course name,Credits,Level,Department,Division\n\
             C1,Logic,,,,MATH/Algebra\n",
        ))
        .unwrap();
        assert_eq!(m.derive_division_departments().unwrap(), 1);

        let ns = m.graph().namespace().clone();
        assert_eq!(
            m.graph()
                .linked(&ns.iri("division_MATH%2FAlgebra"), ObjectProperty::BelongsTo),
            vec![&ns.iri("department_MATH")]
        );
    }
}
