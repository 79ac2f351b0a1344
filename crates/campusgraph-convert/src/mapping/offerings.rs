//! Course offerings: instances joined with their planning, and programme
//! curricula.

use std::collections::{HashMap, HashSet};

use campusgraph_core::issues::Location;
use campusgraph_core::{Class, DatatypeProperty, Issue, Literal, ObjectProperty};

use super::{location, Mapper};
use crate::error::Result;
use crate::fields;
use crate::records::{CourseInstanceRow, CoursePlanningRow, ProgrammeCourseRow};
use crate::resolve::Family;
use crate::tables::TableName;

impl Mapper {
    /// Inner join of course instances with planning rows on
    /// `Instance_id = Course`, in instance table order. Every matching
    /// pair is mapped; rows on either side without a partner are reported.
    pub fn map_course_instances(
        &mut self,
        instances: &[(usize, CourseInstanceRow)],
        plannings: &[(usize, CoursePlanningRow)],
    ) -> Result<usize> {
        let mut by_instance: HashMap<String, Vec<(usize, &CoursePlanningRow)>> = HashMap::new();
        for (row, planning) in plannings {
            let at = location(TableName::CoursePlannings, *row);
            let raw = planning.course.as_deref();
            if let Some(id) = self.required(fields::text(raw), raw, "Course", &at)? {
                by_instance.entry(id).or_default().push((*row, planning));
            }
        }

        let mut joined = HashSet::new();
        let mut mapped = 0;
        for (row, instance) in instances {
            let at = location(TableName::CourseInstances, *row);
            let raw = instance.instance_id.as_deref();
            let Some(id) = self.required(fields::text(raw), raw, "Instance_id", &at)? else {
                continue;
            };

            let Some(matches) = by_instance.get(&id) else {
                self.report(Issue::UnmatchedJoin {
                    at,
                    key: id,
                    other_table: TableName::CoursePlannings.to_string(),
                })?;
                continue;
            };

            for (planning_row, planning) in matches {
                let planning_at = location(TableName::CoursePlannings, *planning_row);
                self.map_planned_instance(&id, instance, &at, planning, &planning_at)?;
                mapped += 1;
            }
            joined.insert(id);
        }

        for (row, planning) in plannings {
            if let Ok(id) = fields::text(planning.course.as_deref()) {
                if !joined.contains(&id) {
                    self.report(Issue::UnmatchedJoin {
                        at: location(TableName::CoursePlannings, *row),
                        key: id,
                        other_table: TableName::CourseInstances.to_string(),
                    })?;
                }
            }
        }

        Ok(mapped)
    }

    fn map_planned_instance(
        &mut self,
        id: &str,
        instance: &CourseInstanceRow,
        at: &Location,
        planning: &CoursePlanningRow,
        planning_at: &Location,
    ) -> Result<()> {
        let node = self.describe(Family::CourseInstance, id, Class::CourseInstance, at)?;

        let raw = instance.study_period.as_deref();
        if let Some(period) = self.required(fields::study_period(raw), raw, "Study period", at)? {
            self.set(&node, DatatypeProperty::StudyPeriod, Literal::int(period), at)?;
        }
        let raw = instance.academic_year.as_deref();
        if let Some(year) = self.required(fields::academic_year(raw), raw, "Academic year", at)? {
            self.set(&node, DatatypeProperty::StudyYear, Literal::int(year), at)?;
        }

        let planned = [
            (
                planning.planned_students.as_deref(),
                "Planned number of Students",
                DatatypeProperty::PlanningNumStudents,
            ),
            (
                planning.senior_hours.as_deref(),
                "Senior Hours",
                DatatypeProperty::SeniorHours,
            ),
            (
                planning.assistant_hours.as_deref(),
                "Assistant Hours",
                DatatypeProperty::AssistantHours,
            ),
        ];
        for (raw, column, property) in planned {
            if let Some(value) = self.required(fields::int(raw), raw, column, planning_at)? {
                self.set(&node, property, Literal::int(value), planning_at)?;
            }
        }

        let raw = instance.course_code.as_deref();
        if let Some(code) = self.required(fields::text(raw), raw, "Course code", at)? {
            let code = fields::code(&code);
            let course = self.reference(Family::Course, &code, Class::Course, "Course code", at)?;
            self.link(&node, ObjectProperty::CInstanceOf, &course, at)?;
            self.instance_courses.entry(id.to_string()).or_insert(code);
        }

        let raw = instance.examiner.as_deref();
        if let Some(examiner) = self.required(fields::text(raw), raw, "Examiner", at)? {
            let teacher =
                self.reference(Family::Teacher, &examiner, Class::SeniorTeacher, "Examiner", at)?;
            self.link(&node, ObjectProperty::ExaminedBy, &teacher, at)?;
        }

        Ok(())
    }

    /// One curriculum entry per row, plus the derived `includesCourse`
    /// edge from the programme to the course. Programme names resolve
    /// through the aliases learnt by [`Mapper::learn_program_aliases`].
    pub fn map_programme_courses(&mut self, rows: &[(usize, ProgrammeCourseRow)]) -> Result<usize> {
        let mut mapped = 0;
        for (row, record) in rows {
            let at = location(TableName::ProgrammeCourses, *row);

            let code = fields::text(record.programme_code.as_deref()).ok();
            let name = fields::text(record.programme_name.as_deref()).ok();
            let Some(programme) = code.as_deref().or(name.as_deref()) else {
                self.report(Issue::MissingValue {
                    at,
                    column: "Programme code".to_string(),
                })?;
                continue;
            };
            let program_code = self.registry.resolve_program(programme);
            let program = self.reference(
                Family::Program,
                &program_code,
                Class::Program,
                "Programme code",
                &at,
            )?;
            if let Some(name) = &name {
                self.set(&program, DatatypeProperty::ProgramName, Literal::string(name), &at)?;
            }

            let raw = record.course_code.as_deref();
            let Some(course_code) = self.required(fields::text(raw), raw, "Course code", &at)?
            else {
                continue;
            };
            let course_code = fields::code(&course_code);
            let course =
                self.reference(Family::Course, &course_code, Class::Course, "Course code", &at)?;
            let raw = record.course_name.as_deref();
            if let Some(course_name) = self.optional(fields::text(raw), raw, "Course name", &at)? {
                self.set(&course, DatatypeProperty::CourseName, Literal::string(course_name), &at)?;
            }

            let raw = record.academic_year.as_deref();
            let academic_year =
                self.optional(fields::academic_year(raw), raw, "Academic year", &at)?;
            let year_key = academic_year.map(|y| y.to_string()).unwrap_or_default();
            let entry = self
                .entity(
                    Family::CurriculumEntry,
                    &[&program_code, &course_code, &year_key],
                    Class::CurriculumEntry,
                    &at,
                )?
                .node;

            if let Some(year) = academic_year {
                self.set(&entry, DatatypeProperty::AcademicYear, Literal::int(year), &at)?;
            }
            let raw = record.study_year.as_deref();
            if let Some(year) = self.optional(fields::int(raw), raw, "Study year", &at)? {
                self.set(&entry, DatatypeProperty::ProgrammeYear, Literal::int(year), &at)?;
            }
            let raw = record.course_type.as_deref();
            if let Some(kind) = self.optional(fields::text(raw), raw, "Course type", &at)? {
                self.set(&entry, DatatypeProperty::CourseType, Literal::string(kind), &at)?;
            }

            self.link(&entry, ObjectProperty::CurriculumOf, &program, &at)?;
            self.link(&entry, ObjectProperty::CurriculumCourse, &course, &at)?;
            self.link(&program, ObjectProperty::IncludesCourse, &course, &at)?;
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

    const INSTANCES: &str = "Instance_id,Course code,Academic year,Study period,Examiner\n\
        I1,dd2421,2020-2021,1.0,t1\n\
        I2,DD2421,2021-2022,3,t1\n\
        I3,SF1624,2020-2021,2,t2\n";

    const PLANNINGS: &str = "Course,Planned number of Students,Senior Hours,Assistant Hours\n\
        I1,120,80,200\n\
        I3,40,30,10\n\
        I9,5,5,5\n";

    fn mapper() -> Mapper {
        Mapper::new(Namespace::new("http://example.org/uni/").unwrap(), false)
    }

    #[test]
    fn test_join_maps_matching_pairs() {
        let mut m = mapper();
        let mapped = m
            .map_course_instances(&rows(INSTANCES), &rows(PLANNINGS))
            .unwrap();
        assert_eq!(mapped, 2);

        let ns = m.graph().namespace().clone();
        let i1 = ns.iri("courseInstance_I1");
        let graph = m.graph();
        assert_eq!(
            graph.literal(&i1, DatatypeProperty::StudyPeriod),
            Some(&Literal::int(1))
        );
        assert_eq!(
            graph.literal(&i1, DatatypeProperty::StudyYear),
            Some(&Literal::int(2020))
        );
        assert_eq!(
            graph.literal(&i1, DatatypeProperty::AssistantHours),
            Some(&Literal::int(200))
        );
        assert_eq!(
            graph.linked(&i1, ObjectProperty::CInstanceOf),
            vec![&ns.iri("course_DD2421")]
        );
        assert_eq!(
            graph.linked(&i1, ObjectProperty::ExaminedBy),
            vec![&ns.iri("teacher_t1")]
        );

        // I2 has no planning row and is not mapped.
        assert!(graph.class_of(&ns.iri("courseInstance_I2")).is_none());
    }

    #[test]
    fn test_unmatched_rows_on_both_sides_are_reported() {
        let mut m = mapper();
        m.map_course_instances(&rows(INSTANCES), &rows(PLANNINGS))
            .unwrap();

        let unmatched: Vec<(&str, &str)> = m
            .issues()
            .iter()
            .filter_map(|issue| match issue {
                Issue::UnmatchedJoin {
                    key, other_table, ..
                } => Some((key.as_str(), other_table.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            unmatched,
            vec![("I2", "Course_plannings"), ("I9", "Course_Instances")]
        );
    }

    #[test]
    fn test_duplicate_planning_rows_conflict() {
        let mut m = mapper();
        let plannings = "Course,Planned number of Students,Senior Hours,Assistant Hours\n\
            I1,120,80,200\n\
            I1,100,80,200\n";
        let mapped = m
            .map_course_instances(&rows(INSTANCES), &rows(plannings))
            .unwrap();
        assert_eq!(mapped, 2);

        let instance = m.graph().namespace().iri("courseInstance_I1");
        assert_eq!(
            m.graph()
                .literal(&instance, DatatypeProperty::PlanningNumStudents),
            Some(&Literal::int(120))
        );
        assert!(m
            .issues()
            .iter()
            .any(|i| matches!(i, Issue::Conflict { property, .. } if property == "planningNumStudents")));
    }

    const CURRICULUM_HEADER: &str =
        "Programme code,Programme name,Course code,Course name,Study year,Academic year,Course type\n";

    fn curriculum(body: &str) -> Vec<(usize, ProgrammeCourseRow)> {
        rows(&format!("{CURRICULUM_HEADER}{body}"))
    }

    #[test]
    fn test_curriculum_entry_and_includes_course() {
        let mut m = mapper();
        let entries = curriculum(
            "CDATE,Computer Science,DD2421,Machine Learning,4,2020-2021,Elective\n\
             ,Computer Science,SF1624,Algebra,1,2020-2021,Mandatory\n",
        );
        m.learn_program_aliases(&[], &entries).unwrap();
        let mapped = m.map_programme_courses(&entries).unwrap();
        assert_eq!(mapped, 2);

        let ns = m.graph().namespace().clone();
        let program = ns.iri("program_CDATE");
        assert_eq!(
            m.graph().linked(&program, ObjectProperty::IncludesCourse),
            vec![&ns.iri("course_DD2421"), &ns.iri("course_SF1624")]
        );

        let entry = ns.iri("curriculum_CDATE_DD2421_2020");
        assert_eq!(m.graph().class_of(&entry), Some(Class::CurriculumEntry));
        assert_eq!(
            m.graph().literal(&entry, DatatypeProperty::ProgrammeYear),
            Some(&Literal::int(4))
        );
        assert_eq!(
            m.graph().literal(&entry, DatatypeProperty::CourseType),
            Some(&Literal::string("Elective"))
        );
        assert!(m.issues().is_empty());
    }

    #[test]
    fn test_name_only_row_before_code_row_is_one_programme() {
        let mut m = mapper();
        let entries = curriculum(
            ",Computer Science,SF1624,Algebra,1,2020-2021,Mandatory\n\
             CDATE,Computer Science,DD2421,Machine Learning,4,2020-2021,Elective\n",
        );
        m.learn_program_aliases(&[], &entries).unwrap();
        m.map_programme_courses(&entries).unwrap();

        let ns = m.graph().namespace().clone();
        let program = ns.iri("program_CDATE");
        assert_eq!(m.graph().nodes_of_class(Class::Program), vec![&program]);
        assert_eq!(
            m.graph().linked(&program, ObjectProperty::IncludesCourse),
            vec![&ns.iri("course_DD2421"), &ns.iri("course_SF1624")]
        );
        assert!(m.issues().is_empty());
    }
}
