//! Students, teaching assistants and their course registrations.

use campusgraph_core::{Class, DatatypeProperty, Literal, ObjectProperty};

use super::{location, Mapper};
use crate::error::Result;
use crate::fields;
use crate::records::{RegistrationRow, StudentRow};
use crate::resolve::Family;
use crate::tables::TableName;

impl Mapper {
    pub fn map_students(&mut self, rows: &[(usize, StudentRow)]) -> Result<usize> {
        let mut mapped = 0;
        for (row, record) in rows {
            let at = location(TableName::Students, *row);
            let raw = record.student_id.as_deref();
            let Some(id) = self.required(fields::text(raw), raw, "Student id", &at)? else {
                continue;
            };

            let raw = record.student_name.as_deref();
            let name = self.required(fields::text(raw), raw, "Student name", &at)?;
            let class = match &name {
                Some(name) if fields::is_teaching_assistant(name) => Class::TeachingAssistant,
                _ => Class::Student,
            };

            let person = self.describe(Family::Person, &id, class, &at)?;
            if let Some(name) = name {
                self.set(&person, DatatypeProperty::Name, Literal::string(name), &at)?;
            }

            let raw = record.year.as_deref();
            if let Some(year) = self.required(fields::int(raw), raw, "Year", &at)? {
                self.set(&person, DatatypeProperty::YearStarted, Literal::int(year), &at)?;
            }
            let raw = record.graduated.as_deref();
            if let Some(graduated) = self.required(fields::graduated(raw), raw, "Graduated", &at)? {
                self.set(
                    &person,
                    DatatypeProperty::Graduated,
                    Literal::boolean(graduated),
                    &at,
                )?;
            }

            let raw = record.programme.as_deref();
            if let Some(programme) = self.required(fields::text(raw), raw, "Programme", &at)? {
                let program = self.program_reference(&programme, "Programme", &at)?;
                self.link(&person, ObjectProperty::EnrolledIn, &program, &at)?;
            }
            mapped += 1;
        }
        Ok(mapped)
    }

    pub fn map_registrations(&mut self, rows: &[(usize, RegistrationRow)]) -> Result<usize> {
        let mut mapped = 0;
        for (row, record) in rows {
            let at = location(TableName::Registrations, *row);
            let raw = record.instance_id.as_deref();
            let instance_id = self.required(fields::text(raw), raw, "Course Instance", &at)?;
            let raw = record.student_id.as_deref();
            let student_id = self.required(fields::text(raw), raw, "Student id", &at)?;
            let (Some(instance_id), Some(student_id)) = (instance_id, student_id) else {
                continue;
            };

            let instance = self.reference(
                Family::CourseInstance,
                &instance_id,
                Class::CourseInstance,
                "Course Instance",
                &at,
            )?;
            let student = self.person_reference(
                &student_id,
                [Family::Person, Family::Teacher],
                "Student id",
                &at,
            )?;
            let registration = self
                .entity(
                    Family::Registration,
                    &[&instance_id, &student_id],
                    Class::Registration,
                    &at,
                )?
                .node;

            let raw = record.status.as_deref();
            if let Some(status) = self.optional(fields::text(raw), raw, "Status", &at)? {
                self.set(
                    &registration,
                    DatatypeProperty::RegistrationStatus,
                    Literal::string(status),
                    &at,
                )?;
            }
            let raw = record.grade.as_deref();
            if let Some(grade) = self.optional(fields::text(raw), raw, "Grade", &at)? {
                self.set(&registration, DatatypeProperty::Grade, Literal::string(grade), &at)?;
            }

            self.link(&registration, ObjectProperty::RegisteredStudent, &student, &at)?;
            self.link(&registration, ObjectProperty::RegisteredInstance, &instance, &at)?;
            mapped += 1;
        }
        Ok(mapped)
    }
}

#[cfg(test)]
mod tests {
    use campusgraph_core::{Issue, Namespace};

    use super::super::testing::rows;
    use super::*;
    use crate::records::ProgrammeRow;

    const STUDENTS: &str = "Student id,Student name,Programme,Year,Graduated\n\
        s1,Ada Lovelace,CDATE,2020,True\n\
        s2,TA Grace Hopper,Computer Science,2018,False\n";

    fn mapper() -> Mapper {
        Mapper::new(Namespace::new("http://example.org/uni/").unwrap(), false)
    }

    #[test]
    fn test_students_and_teaching_assistants() {
        let mut m = mapper();
        m.map_students(&rows(STUDENTS)).unwrap();

        let ns = m.graph().namespace().clone();
        let s1 = ns.iri("person_s1");
        let s2 = ns.iri("person_s2");
        assert_eq!(m.graph().class_of(&s1), Some(Class::Student));
        assert_eq!(m.graph().class_of(&s2), Some(Class::TeachingAssistant));
        assert_eq!(
            m.graph().literal(&s1, DatatypeProperty::Graduated),
            Some(&Literal::boolean(true))
        );
        assert_eq!(
            m.graph().literal(&s2, DatatypeProperty::Name),
            Some(&Literal::string("TA Grace Hopper"))
        );
        assert_eq!(
            m.graph().linked(&s1, ObjectProperty::EnrolledIn),
            vec![&ns.iri("program_CDATE")]
        );
    }

    #[test]
    fn test_programme_name_resolves_through_alias() {
        let mut m = mapper();
        m.mark_loaded(TableName::Programmes);
        let programmes: Vec<(usize, ProgrammeRow)> = rows(
            "Programme code,Programme name,Department name,Director\n\
             CDATE,Computer Science,,\n",
        );
        m.learn_program_aliases(&programmes, &[]).unwrap();
        m.map_programmes(&programmes).unwrap();
        m.map_students(&rows(STUDENTS)).unwrap();

        let ns = m.graph().namespace().clone();
        let program = ns.iri("program_CDATE");
        assert_eq!(
            m.graph()
                .linked(&ns.iri("person_s2"), ObjectProperty::EnrolledIn),
            vec![&program]
        );
        assert!(m.issues().is_empty());
        assert_eq!(m.graph().nodes_of_class(Class::Program), vec![&program]);
    }

    #[test]
    fn test_unknown_programme_is_dangling_once_programmes_are_loaded() {
        let mut m = mapper();
        m.mark_loaded(TableName::Programmes);
        m.map_students(&rows(
            "Student id,Student name,Programme,Year,Graduated\ns1,Ada,TIEMM,2020,False\n",
        ))
        .unwrap();

        assert!(matches!(
            m.issues(),
            [Issue::DanglingReference { value, .. }] if value == "TIEMM"
        ));
        let program = m.graph().namespace().iri("program_TIEMM");
        assert_eq!(
            m.graph().literal(&program, DatatypeProperty::ProgramCode),
            Some(&Literal::string("TIEMM"))
        );
    }

    #[test]
    fn test_registration_links_student_and_instance() {
        let mut m = mapper();
        m.mark_loaded(TableName::CourseInstances);
        m.mark_loaded(TableName::Students);
        m.map_students(&rows(STUDENTS)).unwrap();
        m.map_registrations(&rows(
            "Course Instance,Student id,Status,Grade\n\
             I1,s1,completed,A\n\
             I1,s7,registered,\n",
        ))
        .unwrap();

        let ns = m.graph().namespace().clone();
        let reg = ns.iri("registration_I1_s1");
        assert_eq!(m.graph().class_of(&reg), Some(Class::Registration));
        assert_eq!(
            m.graph().linked(&reg, ObjectProperty::RegisteredStudent),
            vec![&ns.iri("person_s1")]
        );
        assert_eq!(
            m.graph().literal(&reg, DatatypeProperty::Grade),
            Some(&Literal::string("A"))
        );

        // s7 became a Person stub; I1 was never described.
        assert_eq!(m.graph().class_of(&ns.iri("person_s7")), Some(Class::Person));
        let dangling: Vec<&str> = m
            .issues()
            .iter()
            .filter_map(|i| match i {
                Issue::DanglingReference { value, .. } => Some(value.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(dangling, vec!["I1", "I1", "s7"]);
    }
}
