//! Assigned and reported teaching hours.

use campusgraph_core::{Class, DatatypeProperty, Issue, Literal, ObjectProperty};

use super::{location, Mapper};
use crate::error::Result;
use crate::fields;
use crate::records::{AssignedHoursRow, HoursRow, ReportedHoursRow};
use crate::resolve::Family;
use crate::tables::TableName;

impl Mapper {
    pub fn map_assigned_hours(&mut self, rows: &[(usize, AssignedHoursRow)]) -> Result<usize> {
        let rows: Vec<(usize, &HoursRow)> = rows.iter().map(|(row, r)| (*row, &r.0)).collect();
        self.map_hours(TableName::AssignedHours, Family::AssignedHours, &rows)
    }

    pub fn map_reported_hours(&mut self, rows: &[(usize, ReportedHoursRow)]) -> Result<usize> {
        let rows: Vec<(usize, &HoursRow)> = rows.iter().map(|(row, r)| (*row, &r.0)).collect();
        self.map_hours(TableName::ReportedHours, Family::ReportedHours, &rows)
    }

    /// One hours record per (instance, person) with `hoursFor`, `hoursBy`
    /// and the derived `teachesIn` edge.
    fn map_hours(
        &mut self,
        table: TableName,
        family: Family,
        rows: &[(usize, &HoursRow)],
    ) -> Result<usize> {
        let class = match family {
            Family::ReportedHours => Class::ReportedHours,
            _ => Class::AssignedHours,
        };

        let mut mapped = 0;
        for (row, record) in rows {
            let at = location(table, *row);
            let raw = record.instance_id.as_deref();
            let instance_id = self.required(fields::text(raw), raw, "Instance_id", &at)?;
            let raw = record.teacher_id.as_deref();
            let person_id = self.required(fields::text(raw), raw, "Teacher id", &at)?;
            let (Some(instance_id), Some(person_id)) = (instance_id, person_id) else {
                continue;
            };

            let raw = record.course_code.as_deref();
            if let Ok(code) = fields::text(raw) {
                let code = fields::code(&code);
                if let Some(known) = self.instance_courses.get(&instance_id) {
                    if *known != code {
                        let expected = format!("{known}, the course of instance {instance_id}");
                        self.report(Issue::InvalidValue {
                            at: at.clone(),
                            column: "Course code".to_string(),
                            value: raw.unwrap_or_default().to_string(),
                            expected,
                        })?;
                    }
                }
            }

            let instance = self.reference(
                Family::CourseInstance,
                &instance_id,
                Class::CourseInstance,
                "Instance_id",
                &at,
            )?;
            let person = self.person_reference(
                &person_id,
                [Family::Teacher, Family::Person],
                "Teacher id",
                &at,
            )?;
            let record_node = self
                .entity(family, &[&instance_id, &person_id], class, &at)?
                .node;

            let raw = record.hours.as_deref();
            if let Some(hours) = self.required(fields::int(raw), raw, "Hours", &at)? {
                self.set(&record_node, DatatypeProperty::Hours, Literal::int(hours), &at)?;
            }

            self.link(&record_node, ObjectProperty::HoursFor, &instance, &at)?;
            self.link(&record_node, ObjectProperty::HoursBy, &person, &at)?;
            self.link(&person, ObjectProperty::TeachesIn, &instance, &at)?;
            mapped += 1;
        }
        Ok(mapped)
    }
}

#[cfg(test)]
mod tests {
    use campusgraph_core::Namespace;

    use super::super::testing::rows;
    use super::*;

    fn mapper() -> Mapper {
        let mut m = Mapper::new(Namespace::new("http://example.org/uni/").unwrap(), false);
        m.map_course_instances(
            &rows(
                "Instance_id,Course code,Academic year,Study period,Examiner\n\
                 I1,DD2421,2020-2021,1,t1\n",
            ),
            &rows("Course,Planned number of Students,Senior Hours,Assistant Hours\nI1,10,20,30\n"),
        )
        .unwrap();
        m.map_students(&rows(
            "Student id,Student name,Programme,Year,Graduated\ns5,TA Bob,CDATE,2019,False\n",
        ))
        .unwrap();
        m
    }

    #[test]
    fn test_hours_resolve_teachers_before_students() {
        let mut m = mapper();
        m.map_assigned_hours(&rows(
            "Course code,Instance_id,Teacher id,Hours\n\
             DD2421,I1,t1,40\n\
             DD2421,I1,s5,25.0\n",
        ))
        .unwrap();

        let ns = m.graph().namespace().clone();
        let instance = ns.iri("courseInstance_I1");
        let by_teacher = ns.iri("assignedHours_I1_t1");
        assert_eq!(m.graph().class_of(&by_teacher), Some(Class::AssignedHours));
        assert_eq!(
            m.graph().linked(&by_teacher, ObjectProperty::HoursBy),
            vec![&ns.iri("teacher_t1")]
        );
        assert_eq!(
            m.graph()
                .linked(&ns.iri("assignedHours_I1_s5"), ObjectProperty::HoursBy),
            vec![&ns.iri("person_s5")]
        );
        assert_eq!(
            m.graph()
                .literal(&ns.iri("assignedHours_I1_s5"), DatatypeProperty::Hours),
            Some(&Literal::int(25))
        );
        assert_eq!(
            m.graph()
                .linked(&ns.iri("person_s5"), ObjectProperty::TeachesIn),
            vec![&instance]
        );
        assert!(m.issues().is_empty());
    }

    #[test]
    fn test_unknown_person_becomes_teacher_stub() {
        let mut m = mapper();
        m.map_reported_hours(&rows(
            "Course code,Instance_id,Teacher id,Hours\nDD2421,I1,x9,12\n",
        ))
        .unwrap();

        let ns = m.graph().namespace().clone();
        assert_eq!(
            m.graph().class_of(&ns.iri("teacher_x9")),
            Some(Class::SeniorTeacher)
        );
        assert_eq!(
            m.graph().class_of(&ns.iri("reportedHours_I1_x9")),
            Some(Class::ReportedHours)
        );
    }

    #[test]
    fn test_course_code_must_match_instance() {
        let mut m = mapper();
        m.map_assigned_hours(&rows(
            "Course code,Instance_id,Teacher id,Hours\nSF1624,I1,t1,40\n",
        ))
        .unwrap();

        assert!(matches!(
            m.issues(),
            [Issue::InvalidValue { column, value, .. }] if column == "Course code" && value == "SF1624"
        ));
        // The record itself is still mapped.
        let record = m.graph().namespace().iri("assignedHours_I1_t1");
        assert!(m.graph().class_of(&record).is_some());
    }
}
