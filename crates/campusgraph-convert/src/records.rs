//! Typed rows of the input tables.
//!
//! Every field is an `Option<String>`: blank cells are `None` and values
//! are interpreted later by [`crate::fields`], so one malformed cell never
//! rejects a whole row.

use serde::Deserialize;

use crate::tables::{TableName, TableRecord};

/// `Course_Instances.csv`: one offering of a course in a study period.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseInstanceRow {
    #[serde(rename = "Instance_id")]
    pub instance_id: Option<String>,
    #[serde(rename = "Course code")]
    pub course_code: Option<String>,
    #[serde(rename = "Academic year")]
    pub academic_year: Option<String>,
    #[serde(rename = "Study period")]
    pub study_period: Option<String>,
    #[serde(rename = "Examiner")]
    pub examiner: Option<String>,
}

impl TableRecord for CourseInstanceRow {
    const TABLE: TableName = TableName::CourseInstances;
    const COLUMNS: &'static [&'static str] = &[
        "Instance_id",
        "Course code",
        "Academic year",
        "Study period",
        "Examiner",
    ];
}

/// `Course_plannings.csv`: planned staffing keyed by instance id.
#[derive(Debug, Clone, Deserialize)]
pub struct CoursePlanningRow {
    /// Holds the course instance id, despite the header.
    #[serde(rename = "Course")]
    pub course: Option<String>,
    #[serde(rename = "Planned number of Students")]
    pub planned_students: Option<String>,
    #[serde(rename = "Senior Hours")]
    pub senior_hours: Option<String>,
    #[serde(rename = "Assistant Hours")]
    pub assistant_hours: Option<String>,
}

impl TableRecord for CoursePlanningRow {
    const TABLE: TableName = TableName::CoursePlannings;
    const COLUMNS: &'static [&'static str] = &[
        "Course",
        "Planned number of Students",
        "Senior Hours",
        "Assistant Hours",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentRow {
    #[serde(rename = "Student id")]
    pub student_id: Option<String>,
    #[serde(rename = "Student name")]
    pub student_name: Option<String>,
    /// Programme code or programme name.
    #[serde(rename = "Programme")]
    pub programme: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Graduated")]
    pub graduated: Option<String>,
}

impl TableRecord for StudentRow {
    const TABLE: TableName = TableName::Students;
    const COLUMNS: &'static [&'static str] = &[
        "Student id",
        "Student name",
        "Programme",
        "Year",
        "Graduated",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRow {
    #[serde(rename = "Course code")]
    pub course_code: Option<String>,
    #[serde(rename = "Course name")]
    pub course_name: Option<String>,
    #[serde(rename = "Credits")]
    pub credits: Option<String>,
    #[serde(rename = "Level")]
    pub level: Option<String>,
    #[serde(rename = "Department")]
    pub department: Option<String>,
    #[serde(rename = "Division")]
    pub division: Option<String>,
}

impl TableRecord for CourseRow {
    const TABLE: TableName = TableName::Courses;
    const COLUMNS: &'static [&'static str] = &[
        "Course code",
        "Course name",
        "Credits",
        "Level",
        "Department",
        "Division",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeniorTeacherRow {
    #[serde(rename = "Teacher id")]
    pub teacher_id: Option<String>,
    #[serde(rename = "Teacher name")]
    pub teacher_name: Option<String>,
    #[serde(rename = "Department name")]
    pub department: Option<String>,
    #[serde(rename = "Division name")]
    pub division: Option<String>,
}

impl TableRecord for SeniorTeacherRow {
    const TABLE: TableName = TableName::SeniorTeachers;
    const COLUMNS: &'static [&'static str] = &[
        "Teacher id",
        "Teacher name",
        "Department name",
        "Division name",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgrammeRow {
    #[serde(rename = "Programme code")]
    pub programme_code: Option<String>,
    #[serde(rename = "Programme name")]
    pub programme_name: Option<String>,
    #[serde(rename = "Department name")]
    pub department: Option<String>,
    /// Teacher id of the programme director.
    #[serde(rename = "Director")]
    pub director: Option<String>,
}

impl TableRecord for ProgrammeRow {
    const TABLE: TableName = TableName::Programmes;
    const COLUMNS: &'static [&'static str] = &[
        "Programme code",
        "Programme name",
        "Department name",
        "Director",
    ];
}

/// `Programme_Courses.csv`: one course in a programme's curriculum.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgrammeCourseRow {
    #[serde(rename = "Programme code")]
    pub programme_code: Option<String>,
    #[serde(rename = "Programme name")]
    pub programme_name: Option<String>,
    #[serde(rename = "Course code")]
    pub course_code: Option<String>,
    #[serde(rename = "Course name")]
    pub course_name: Option<String>,
    #[serde(rename = "Study year")]
    pub study_year: Option<String>,
    #[serde(rename = "Academic year")]
    pub academic_year: Option<String>,
    #[serde(rename = "Course type")]
    pub course_type: Option<String>,
}

impl TableRecord for ProgrammeCourseRow {
    const TABLE: TableName = TableName::ProgrammeCourses;
    const COLUMNS: &'static [&'static str] = &[
        "Programme code",
        "Programme name",
        "Course code",
        "Course name",
        "Study year",
        "Academic year",
        "Course type",
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRow {
    #[serde(rename = "Course Instance")]
    pub instance_id: Option<String>,
    #[serde(rename = "Student id")]
    pub student_id: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Grade")]
    pub grade: Option<String>,
}

impl TableRecord for RegistrationRow {
    const TABLE: TableName = TableName::Registrations;
    const COLUMNS: &'static [&'static str] = &["Course Instance", "Student id", "Status", "Grade"];
}

/// Shared layout of `Assigned_Hours.csv` and `Reported_Hours.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct HoursRow {
    #[serde(rename = "Course code")]
    pub course_code: Option<String>,
    #[serde(rename = "Instance_id")]
    pub instance_id: Option<String>,
    #[serde(rename = "Teacher id")]
    pub teacher_id: Option<String>,
    #[serde(rename = "Hours")]
    pub hours: Option<String>,
}

const HOURS_COLUMNS: &[&str] = &["Course code", "Instance_id", "Teacher id", "Hours"];

/// Rows of `Assigned_Hours.csv`.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct AssignedHoursRow(pub HoursRow);

impl TableRecord for AssignedHoursRow {
    const TABLE: TableName = TableName::AssignedHours;
    const COLUMNS: &'static [&'static str] = HOURS_COLUMNS;
}

/// Rows of `Reported_Hours.csv`.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ReportedHoursRow(pub HoursRow);

impl TableRecord for ReportedHoursRow {
    const TABLE: TableName = TableName::ReportedHours;
    const COLUMNS: &'static [&'static str] = HOURS_COLUMNS;
}
