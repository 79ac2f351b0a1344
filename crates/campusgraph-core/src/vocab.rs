//! The university ontology vocabulary.
//!
//! Classes and properties are closed enums so every triple the converter
//! emits names a term of the ontology. Domain, range and functionality are
//! declared here and enforced by the graph crate on every mutation.

use serde::{Deserialize, Serialize};

use crate::config::Namespace;
use crate::types::{Datatype, Iri, Triple, OWL_NS, RDFS_NS};

// ── Classes ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Class {
    Person,
    Student,
    TeachingAssistant,
    SeniorTeacher,
    Course,
    CourseInstance,
    Program,
    Department,
    Division,
    CurriculumEntry,
    Registration,
    HoursRecord,
    AssignedHours,
    ReportedHours,
}

impl Class {
    pub const ALL: [Class; 14] = [
        Class::Person,
        Class::Student,
        Class::TeachingAssistant,
        Class::SeniorTeacher,
        Class::Course,
        Class::CourseInstance,
        Class::Program,
        Class::Department,
        Class::Division,
        Class::CurriculumEntry,
        Class::Registration,
        Class::HoursRecord,
        Class::AssignedHours,
        Class::ReportedHours,
    ];

    pub fn local_name(&self) -> &'static str {
        match self {
            Class::Person => "Person",
            Class::Student => "Student",
            Class::TeachingAssistant => "TeachingAssistant",
            Class::SeniorTeacher => "SeniorTeacher",
            Class::Course => "Course",
            Class::CourseInstance => "CourseInstance",
            Class::Program => "Program",
            Class::Department => "Department",
            Class::Division => "Division",
            Class::CurriculumEntry => "CurriculumEntry",
            Class::Registration => "Registration",
            Class::HoursRecord => "HoursRecord",
            Class::AssignedHours => "AssignedHours",
            Class::ReportedHours => "ReportedHours",
        }
    }

    /// Direct superclass, if any.
    pub fn parent(&self) -> Option<Class> {
        match self {
            Class::Student | Class::TeachingAssistant | Class::SeniorTeacher => Some(Class::Person),
            Class::AssignedHours | Class::ReportedHours => Some(Class::HoursRecord),
            _ => None,
        }
    }

    /// Reflexive, transitive subclass test.
    pub fn is_a(&self, other: Class) -> bool {
        let mut current = Some(*self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.parent();
        }
        false
    }

    /// The `rdf:type` values asserted for a node of this class.
    ///
    /// Students and teaching assistants carry `Person` explicitly; senior
    /// teachers do not.
    pub fn asserted_types(&self) -> Vec<Class> {
        match self {
            Class::Student | Class::TeachingAssistant => vec![Class::Person, *self],
            Class::AssignedHours | Class::ReportedHours => vec![Class::HoursRecord, *self],
            _ => vec![*self],
        }
    }

    pub fn iri(&self, ns: &Namespace) -> Iri {
        ns.iri(self.local_name())
    }
}

// ── Datatype properties ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatatypeProperty {
    InstanceId,
    StudyPeriod,
    StudyYear,
    PlanningNumStudents,
    SeniorHours,
    AssistantHours,
    CourseCode,
    CourseName,
    Credits,
    Level,
    TeacherId,
    PersonId,
    Name,
    ProgramCode,
    ProgramName,
    YearStarted,
    Graduated,
    DepartmentName,
    DivisionName,
    CourseType,
    ProgrammeYear,
    AcademicYear,
    RegistrationStatus,
    Grade,
    Hours,
}

impl DatatypeProperty {
    pub const ALL: [DatatypeProperty; 25] = [
        DatatypeProperty::InstanceId,
        DatatypeProperty::StudyPeriod,
        DatatypeProperty::StudyYear,
        DatatypeProperty::PlanningNumStudents,
        DatatypeProperty::SeniorHours,
        DatatypeProperty::AssistantHours,
        DatatypeProperty::CourseCode,
        DatatypeProperty::CourseName,
        DatatypeProperty::Credits,
        DatatypeProperty::Level,
        DatatypeProperty::TeacherId,
        DatatypeProperty::PersonId,
        DatatypeProperty::Name,
        DatatypeProperty::ProgramCode,
        DatatypeProperty::ProgramName,
        DatatypeProperty::YearStarted,
        DatatypeProperty::Graduated,
        DatatypeProperty::DepartmentName,
        DatatypeProperty::DivisionName,
        DatatypeProperty::CourseType,
        DatatypeProperty::ProgrammeYear,
        DatatypeProperty::AcademicYear,
        DatatypeProperty::RegistrationStatus,
        DatatypeProperty::Grade,
        DatatypeProperty::Hours,
    ];

    pub fn local_name(&self) -> &'static str {
        match self {
            Self::InstanceId => "instanceId",
            Self::StudyPeriod => "studyPeriod",
            Self::StudyYear => "studyYear",
            Self::PlanningNumStudents => "planningNumStudents",
            Self::SeniorHours => "seniorHours",
            Self::AssistantHours => "assistantHours",
            Self::CourseCode => "courseCode",
            Self::CourseName => "courseName",
            Self::Credits => "credits",
            Self::Level => "level",
            Self::TeacherId => "teacherId",
            Self::PersonId => "personId",
            Self::Name => "name",
            Self::ProgramCode => "programCode",
            Self::ProgramName => "programName",
            Self::YearStarted => "yearStarted",
            Self::Graduated => "graduated",
            Self::DepartmentName => "departmentName",
            Self::DivisionName => "divisionName",
            Self::CourseType => "courseType",
            Self::ProgrammeYear => "programmeYear",
            Self::AcademicYear => "academicYear",
            Self::RegistrationStatus => "registrationStatus",
            Self::Grade => "grade",
            Self::Hours => "hours",
        }
    }

    pub fn domain(&self) -> Class {
        match self {
            Self::InstanceId
            | Self::StudyPeriod
            | Self::StudyYear
            | Self::PlanningNumStudents
            | Self::SeniorHours
            | Self::AssistantHours => Class::CourseInstance,
            Self::CourseCode | Self::CourseName | Self::Credits | Self::Level => Class::Course,
            Self::TeacherId => Class::SeniorTeacher,
            Self::PersonId | Self::Name | Self::YearStarted | Self::Graduated => Class::Person,
            Self::ProgramCode | Self::ProgramName => Class::Program,
            Self::DepartmentName => Class::Department,
            Self::DivisionName => Class::Division,
            Self::CourseType | Self::ProgrammeYear | Self::AcademicYear => Class::CurriculumEntry,
            Self::RegistrationStatus | Self::Grade => Class::Registration,
            Self::Hours => Class::HoursRecord,
        }
    }

    pub fn datatype(&self) -> Datatype {
        match self {
            Self::StudyPeriod
            | Self::StudyYear
            | Self::PlanningNumStudents
            | Self::SeniorHours
            | Self::AssistantHours
            | Self::YearStarted
            | Self::ProgrammeYear
            | Self::AcademicYear
            | Self::Hours => Datatype::Int,
            Self::Credits => Datatype::Decimal,
            Self::Graduated => Datatype::Boolean,
            _ => Datatype::String,
        }
    }

    /// Every datatype property in this vocabulary is single-valued.
    pub fn is_functional(&self) -> bool {
        true
    }

    pub fn iri(&self, ns: &Namespace) -> Iri {
        ns.iri(self.local_name())
    }
}

// ── Object properties ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectProperty {
    CInstanceOf,
    ExaminedBy,
    EnrolledIn,
    WorksIn,
    MemberOf,
    BelongsTo,
    OwnedBy,
    OfferedBy,
    HostedBy,
    DirectedBy,
    IncludesCourse,
    CurriculumOf,
    CurriculumCourse,
    RegisteredStudent,
    RegisteredInstance,
    HoursFor,
    HoursBy,
    TeachesIn,
}

impl ObjectProperty {
    pub const ALL: [ObjectProperty; 18] = [
        ObjectProperty::CInstanceOf,
        ObjectProperty::ExaminedBy,
        ObjectProperty::EnrolledIn,
        ObjectProperty::WorksIn,
        ObjectProperty::MemberOf,
        ObjectProperty::BelongsTo,
        ObjectProperty::OwnedBy,
        ObjectProperty::OfferedBy,
        ObjectProperty::HostedBy,
        ObjectProperty::DirectedBy,
        ObjectProperty::IncludesCourse,
        ObjectProperty::CurriculumOf,
        ObjectProperty::CurriculumCourse,
        ObjectProperty::RegisteredStudent,
        ObjectProperty::RegisteredInstance,
        ObjectProperty::HoursFor,
        ObjectProperty::HoursBy,
        ObjectProperty::TeachesIn,
    ];

    pub fn local_name(&self) -> &'static str {
        match self {
            Self::CInstanceOf => "cInstanceOf",
            Self::ExaminedBy => "examinedBy",
            Self::EnrolledIn => "enrolledIn",
            Self::WorksIn => "worksIn",
            Self::MemberOf => "memberOf",
            Self::BelongsTo => "belongsTo",
            Self::OwnedBy => "ownedBy",
            Self::OfferedBy => "offeredBy",
            Self::HostedBy => "hostedBy",
            Self::DirectedBy => "directedBy",
            Self::IncludesCourse => "includesCourse",
            Self::CurriculumOf => "curriculumOf",
            Self::CurriculumCourse => "curriculumCourse",
            Self::RegisteredStudent => "registeredStudent",
            Self::RegisteredInstance => "registeredInstance",
            Self::HoursFor => "hoursFor",
            Self::HoursBy => "hoursBy",
            Self::TeachesIn => "teachesIn",
        }
    }

    pub fn domain(&self) -> Class {
        match self {
            Self::CInstanceOf | Self::ExaminedBy => Class::CourseInstance,
            Self::EnrolledIn | Self::TeachesIn => Class::Person,
            Self::WorksIn | Self::MemberOf => Class::SeniorTeacher,
            Self::BelongsTo => Class::Division,
            Self::OwnedBy | Self::OfferedBy => Class::Course,
            Self::HostedBy | Self::DirectedBy | Self::IncludesCourse => Class::Program,
            Self::CurriculumOf | Self::CurriculumCourse => Class::CurriculumEntry,
            Self::RegisteredStudent | Self::RegisteredInstance => Class::Registration,
            Self::HoursFor | Self::HoursBy => Class::HoursRecord,
        }
    }

    pub fn range(&self) -> Class {
        match self {
            Self::CInstanceOf | Self::IncludesCourse | Self::CurriculumCourse => Class::Course,
            Self::ExaminedBy | Self::DirectedBy => Class::SeniorTeacher,
            Self::EnrolledIn | Self::CurriculumOf => Class::Program,
            Self::WorksIn | Self::OwnedBy => Class::Division,
            Self::MemberOf | Self::BelongsTo | Self::OfferedBy | Self::HostedBy => {
                Class::Department
            }
            Self::RegisteredStudent | Self::HoursBy => Class::Person,
            Self::RegisteredInstance | Self::HoursFor | Self::TeachesIn => Class::CourseInstance,
        }
    }

    pub fn is_functional(&self) -> bool {
        !matches!(self, Self::IncludesCourse | Self::TeachesIn)
    }

    pub fn iri(&self, ns: &Namespace) -> Iri {
        ns.iri(self.local_name())
    }
}

// ── Schema rendering ──────────────────────────────────────────────

/// Render the vocabulary itself as OWL/RDFS declarations.
pub fn schema_triples(ns: &Namespace) -> Vec<Triple> {
    let rdf_type = Iri::rdf_type;
    let owl = |local: &str| Iri(format!("{OWL_NS}{local}"));
    let rdfs = |local: &str| Iri(format!("{RDFS_NS}{local}"));

    let mut triples = Vec::new();

    for class in Class::ALL {
        triples.push(Triple::new(class.iri(ns), rdf_type(), owl("Class")));
        if let Some(parent) = class.parent() {
            triples.push(Triple::new(class.iri(ns), rdfs("subClassOf"), parent.iri(ns)));
        }
    }

    for prop in DatatypeProperty::ALL {
        let iri = prop.iri(ns);
        triples.push(Triple::new(iri.clone(), rdf_type(), owl("DatatypeProperty")));
        if prop.is_functional() {
            triples.push(Triple::new(iri.clone(), rdf_type(), owl("FunctionalProperty")));
        }
        triples.push(Triple::new(iri.clone(), rdfs("domain"), prop.domain().iri(ns)));
        triples.push(Triple::new(iri, rdfs("range"), prop.datatype().iri()));
    }

    for prop in ObjectProperty::ALL {
        let iri = prop.iri(ns);
        triples.push(Triple::new(iri.clone(), rdf_type(), owl("ObjectProperty")));
        if prop.is_functional() {
            triples.push(Triple::new(iri.clone(), rdf_type(), owl("FunctionalProperty")));
        }
        triples.push(Triple::new(iri.clone(), rdfs("domain"), prop.domain().iri(ns)));
        triples.push(Triple::new(iri, rdfs("range"), prop.range().iri(ns)));
    }

    triples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Term;

    #[test]
    fn subclassing_is_transitive_and_reflexive() {
        assert!(Class::Student.is_a(Class::Person));
        assert!(Class::SeniorTeacher.is_a(Class::Person));
        assert!(Class::Course.is_a(Class::Course));
        assert!(Class::ReportedHours.is_a(Class::HoursRecord));
        assert!(!Class::Person.is_a(Class::Student));
        assert!(!Class::Course.is_a(Class::CourseInstance));
    }

    #[test]
    fn asserted_types_follow_person_convention() {
        assert_eq!(
            Class::Student.asserted_types(),
            vec![Class::Person, Class::Student]
        );
        assert_eq!(
            Class::TeachingAssistant.asserted_types(),
            vec![Class::Person, Class::TeachingAssistant]
        );
        assert_eq!(
            Class::SeniorTeacher.asserted_types(),
            vec![Class::SeniorTeacher]
        );
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = Class::ALL.iter().map(|c| c.local_name()).collect();
        names.extend(DatatypeProperty::ALL.iter().map(|p| p.local_name()));
        names.extend(ObjectProperty::ALL.iter().map(|p| p.local_name()));
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn original_property_names_preserved() {
        assert_eq!(ObjectProperty::CInstanceOf.local_name(), "cInstanceOf");
        assert_eq!(DatatypeProperty::PlanningNumStudents.local_name(), "planningNumStudents");
        assert_eq!(DatatypeProperty::Graduated.datatype(), Datatype::Boolean);
        assert_eq!(DatatypeProperty::Credits.datatype(), Datatype::Decimal);
    }

    #[test]
    fn multi_valued_object_properties() {
        assert!(!ObjectProperty::IncludesCourse.is_functional());
        assert!(!ObjectProperty::TeachesIn.is_functional());
        assert!(ObjectProperty::ExaminedBy.is_functional());
    }

    #[test]
    fn schema_declares_subclasses() {
        let ns = Namespace::default();
        let triples = schema_triples(&ns);
        let sub_class_of = Iri(format!("{RDFS_NS}subClassOf"));
        assert!(triples.contains(&Triple::new(
            Class::Student.iri(&ns),
            sub_class_of,
            Term::Iri(Class::Person.iri(&ns)),
        )));
        assert!(triples
            .iter()
            .all(|t| t.subject.as_str().starts_with(ns.base())));
    }
}
