//! Staff, course catalogue and programme tables.

use campusgraph_core::issues::Location;
use campusgraph_core::{Class, DatatypeProperty, Literal, ObjectProperty};
use campusgraph_graph::NodeRef;

use super::{location, Mapper};
use crate::error::Result;
use crate::fields;
use crate::records::{CourseRow, ProgrammeCourseRow, ProgrammeRow, SeniorTeacherRow};
use crate::resolve::Family;
use crate::tables::TableName;

/// A department or division named in a row, with its normalized key.
pub(super) struct OrgUnit {
    pub key: String,
    pub node: NodeRef,
}

impl Mapper {
    pub fn map_senior_teachers(&mut self, rows: &[(usize, SeniorTeacherRow)]) -> Result<usize> {
        let mut mapped = 0;
        for (row, record) in rows {
            let at = location(TableName::SeniorTeachers, *row);
            let raw_id = record.teacher_id.as_deref();
            let Some(id) = self.required(fields::text(raw_id), raw_id, "Teacher id", &at)? else {
                continue;
            };

            let teacher = self.describe(Family::Teacher, &id, Class::SeniorTeacher, &at)?;
            let raw_name = record.teacher_name.as_deref();
            if let Some(name) = self.optional(fields::text(raw_name), raw_name, "Teacher name", &at)? {
                self.set(&teacher, DatatypeProperty::Name, Literal::string(name), &at)?;
            }

            let department = self.org_unit(Family::Department, record.department.as_deref(), &at)?;
            let division = self.org_unit(Family::Division, record.division.as_deref(), &at)?;
            if let Some(department) = &department {
                self.link(&teacher, ObjectProperty::MemberOf, &department.node, &at)?;
            }
            if let Some(division) = &division {
                self.link(&teacher, ObjectProperty::WorksIn, &division.node, &at)?;
            }
            if let (Some(department), Some(division)) = (&department, &division) {
                self.observe_division(&division.key, &department.key, &at)?;
            }
            mapped += 1;
        }
        Ok(mapped)
    }

    pub fn map_courses(&mut self, rows: &[(usize, CourseRow)]) -> Result<usize> {
        let mut mapped = 0;
        for (row, record) in rows {
            let at = location(TableName::Courses, *row);
            let raw_code = record.course_code.as_deref();
            let Some(code) = self.required(fields::text(raw_code), raw_code, "Course code", &at)?
            else {
                continue;
            };

            let course = self.describe(Family::Course, &fields::code(&code), Class::Course, &at)?;

            let raw = record.course_name.as_deref();
            if let Some(name) = self.optional(fields::text(raw), raw, "Course name", &at)? {
                self.set(&course, DatatypeProperty::CourseName, Literal::string(name), &at)?;
            }
            let raw = record.credits.as_deref();
            if let Some(credits) = self.optional(fields::decimal(raw), raw, "Credits", &at)? {
                self.set(&course, DatatypeProperty::Credits, credits, &at)?;
            }
            let raw = record.level.as_deref();
            if let Some(level) = self.optional(fields::text(raw), raw, "Level", &at)? {
                self.set(&course, DatatypeProperty::Level, Literal::string(level), &at)?;
            }

            let department = self.org_unit(Family::Department, record.department.as_deref(), &at)?;
            let division = self.org_unit(Family::Division, record.division.as_deref(), &at)?;
            if let Some(department) = &department {
                self.link(&course, ObjectProperty::OfferedBy, &department.node, &at)?;
            }
            if let Some(division) = &division {
                self.link(&course, ObjectProperty::OwnedBy, &division.node, &at)?;
            }
            if let (Some(department), Some(division)) = (&department, &division) {
                self.observe_division(&division.key, &department.key, &at)?;
            }
            mapped += 1;
        }
        Ok(mapped)
    }

    pub fn map_programmes(&mut self, rows: &[(usize, ProgrammeRow)]) -> Result<usize> {
        let mut mapped = 0;
        for (row, record) in rows {
            let at = location(TableName::Programmes, *row);
            let raw_code = record.programme_code.as_deref();
            let Some(code) =
                self.required(fields::text(raw_code), raw_code, "Programme code", &at)?
            else {
                continue;
            };

            let code = fields::code(&code);
            let program = self.describe(Family::Program, &code, Class::Program, &at)?;

            let raw = record.programme_name.as_deref();
            if let Some(name) = self.optional(fields::text(raw), raw, "Programme name", &at)? {
                self.set(&program, DatatypeProperty::ProgramName, Literal::string(name), &at)?;
            }

            if let Some(department) =
                self.org_unit(Family::Department, record.department.as_deref(), &at)?
            {
                self.link(&program, ObjectProperty::HostedBy, &department.node, &at)?;
            }

            let raw = record.director.as_deref();
            if let Some(director) = self.optional(fields::text(raw), raw, "Director", &at)? {
                let teacher = self.reference(
                    Family::Teacher,
                    &director,
                    Class::SeniorTeacher,
                    "Director",
                    &at,
                )?;
                self.link(&program, ObjectProperty::DirectedBy, &teacher, &at)?;
            }
            mapped += 1;
        }
        Ok(mapped)
    }

    /// Learn every (code, name) programme pair before any row is mapped,
    /// so a row naming a programme resolves to its code regardless of
    /// where the pair appears. Rows lacking either cell are left to the
    /// mapping passes to report.
    pub fn learn_program_aliases(
        &mut self,
        programmes: &[(usize, ProgrammeRow)],
        programme_courses: &[(usize, ProgrammeCourseRow)],
    ) -> Result<usize> {
        let pairs = programmes
            .iter()
            .map(|(row, r)| {
                (
                    location(TableName::Programmes, *row),
                    r.programme_code.as_deref(),
                    r.programme_name.as_deref(),
                )
            })
            .chain(programme_courses.iter().map(|(row, r)| {
                (
                    location(TableName::ProgrammeCourses, *row),
                    r.programme_code.as_deref(),
                    r.programme_name.as_deref(),
                )
            }));

        let mut learnt = 0;
        for (at, raw_code, raw_name) in pairs {
            if let (Ok(code), Ok(name)) = (fields::text(raw_code), fields::text(raw_name)) {
                self.alias_program(&fields::code(&code), &name, &at)?;
                learnt += 1;
            }
        }
        tracing::debug!(learnt, "Programme aliases learnt");
        Ok(learnt)
    }

    /// Declare the department or division a cell names, if it names one.
    pub(super) fn org_unit(
        &mut self,
        family: Family,
        raw: Option<&str>,
        at: &Location,
    ) -> Result<Option<OrgUnit>> {
        let Ok(key) = fields::text(raw) else {
            return Ok(None);
        };
        let class = match family {
            Family::Division => Class::Division,
            _ => Class::Department,
        };
        let node = self.describe(family, &key, class, at)?;
        Ok(Some(OrgUnit { key, node }))
    }
}

#[cfg(test)]
mod tests {
    use campusgraph_core::{Issue, Namespace};

    use super::super::testing::rows;
    use super::*;

    fn mapper() -> Mapper {
        Mapper::new(Namespace::new("http://example.org/uni/").unwrap(), false)
    }

    #[test]
    fn test_teacher_with_department_and_division() {
        let mut m = mapper();
        m.mark_loaded(TableName::SeniorTeachers);
        let mapped = m
            .map_senior_teachers(&rows(
                "Teacher id,Teacher name,Department name,Division name\n\
                 t1,Alan Turing,EECS,Theoretical Computer Science\n",
            ))
            .unwrap();
        assert_eq!(mapped, 1);

        let ns = m.graph().namespace().clone();
        let teacher = ns.iri("teacher_t1");
        assert_eq!(m.graph().class_of(&teacher), Some(Class::SeniorTeacher));
        assert_eq!(
            m.graph().literal(&teacher, DatatypeProperty::TeacherId),
            Some(&Literal::string("t1"))
        );
        assert_eq!(
            m.graph().linked(&teacher, ObjectProperty::WorksIn),
            vec![&ns.iri("division_Theoretical%20Computer%20Science")]
        );
        assert_eq!(
            m.graph().linked(&teacher, ObjectProperty::MemberOf),
            vec![&ns.iri("department_EECS")]
        );
    }

    #[test]
    fn test_blank_teacher_id_skips_row() {
        let mut m = mapper();
        let mapped = m
            .map_senior_teachers(&rows(
                "Teacher id,Teacher name,Department name,Division name\n,Nobody,,\n",
            ))
            .unwrap();
        assert_eq!(mapped, 0);
        assert!(matches!(m.issues(), [Issue::MissingValue { column, .. }] if column == "Teacher id"));
        assert!(m.graph().is_empty());
    }

    #[test]
    fn test_course_catalogue_row() {
        let mut m = mapper();
        m.map_courses(&rows(
            "Course code,Course name,Credits,Level,Department,Division\n\
             dd2421,Machine Learning,7.50,Advanced,EECS,Robotics\n",
        ))
        .unwrap();

        let course = m.graph().namespace().iri("course_DD2421");
        assert_eq!(
            m.graph().literal(&course, DatatypeProperty::CourseCode),
            Some(&Literal::string("DD2421"))
        );
        assert_eq!(
            m.graph()
                .literal(&course, DatatypeProperty::Credits)
                .map(|l| l.lexical.as_str()),
            Some("7.5")
        );
        assert_eq!(m.graph().linked(&course, ObjectProperty::OwnedBy).len(), 1);
    }

    #[test]
    fn test_bad_credits_are_reported_and_skipped() {
        let mut m = mapper();
        m.map_courses(&rows(
            "Course code,Course name,Credits,Level,Department,Division\nX1,Logic,many,,,\n",
        ))
        .unwrap();

        let course = m.graph().namespace().iri("course_X1");
        assert!(m.graph().literal(&course, DatatypeProperty::Credits).is_none());
        assert!(matches!(m.issues(), [Issue::InvalidValue { value, .. }] if value == "many"));
    }

    #[test]
    fn test_programme_director_and_alias() {
        let mut m = mapper();
        m.mark_loaded(TableName::SeniorTeachers);
        m.mark_loaded(TableName::Programmes);
        let programmes: Vec<(usize, ProgrammeRow)> = rows(
            "Programme code,Programme name,Department name,Director\n\
             cdate,Computer Science,EECS,t9\n",
        );
        m.learn_program_aliases(&programmes, &[]).unwrap();
        m.map_programmes(&programmes).unwrap();

        let ns = m.graph().namespace().clone();
        let program = ns.iri("program_CDATE");
        assert_eq!(
            m.graph().linked(&program, ObjectProperty::DirectedBy),
            vec![&ns.iri("teacher_t9")]
        );
        assert_eq!(m.registry().resolve_program("computer science"), "CDATE");

        // t9 is in no teacher row.
        assert!(matches!(
            m.issues(),
            [Issue::DanglingReference { column, .. }] if column == "Director"
        ));
    }

    #[test]
    fn test_conflicting_alias_keeps_first_programme() {
        let mut m = mapper();
        let programmes: Vec<(usize, ProgrammeRow)> = rows(
            "Programme code,Programme name,Department name,Director\n\
             CDATE,Computer Science,,\n\
             TCOMK,Computer Science,,\n",
        );
        assert_eq!(m.learn_program_aliases(&programmes, &[]).unwrap(), 2);

        assert_eq!(m.registry().resolve_program("Computer Science"), "CDATE");
        assert!(matches!(
            m.issues(),
            [Issue::Conflict { property, kept, rejected, .. }]
                if property == "programme alias" && kept == "CDATE" && rejected == "TCOMK"
        ));
    }
}
