//! Tabular input: table catalogue, sources and CSV loading.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// The input tables the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    CourseInstances,
    CoursePlannings,
    Students,
    Courses,
    SeniorTeachers,
    Programmes,
    ProgrammeCourses,
    Registrations,
    AssignedHours,
    ReportedHours,
}

impl TableName {
    pub const ALL: [TableName; 10] = [
        TableName::CourseInstances,
        TableName::CoursePlannings,
        TableName::Students,
        TableName::Courses,
        TableName::SeniorTeachers,
        TableName::Programmes,
        TableName::ProgrammeCourses,
        TableName::Registrations,
        TableName::AssignedHours,
        TableName::ReportedHours,
    ];

    /// File name looked up in the data directory when not overridden.
    pub fn default_file(&self) -> &'static str {
        match self {
            Self::CourseInstances => "Course_Instances.csv",
            Self::CoursePlannings => "Course_plannings.csv",
            Self::Students => "Students.csv",
            Self::Courses => "Courses.csv",
            Self::SeniorTeachers => "Senior_Teachers.csv",
            Self::Programmes => "Programmes.csv",
            Self::ProgrammeCourses => "Programme_Courses.csv",
            Self::Registrations => "Registrations.csv",
            Self::AssignedHours => "Assigned_Hours.csv",
            Self::ReportedHours => "Reported_Hours.csv",
        }
    }

    /// The three tables the original conversion always had.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::CourseInstances | Self::CoursePlannings | Self::Students
        )
    }

    /// Config key (`tables.<key>`) of this table.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CourseInstances => "course_instances",
            Self::CoursePlannings => "course_plannings",
            Self::Students => "students",
            Self::Courses => "courses",
            Self::SeniorTeachers => "senior_teachers",
            Self::Programmes => "programmes",
            Self::ProgrammeCourses => "programme_courses",
            Self::Registrations => "registrations",
            Self::AssignedHours => "assigned_hours",
            Self::ReportedHours => "reported_hours",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.default_file();
        write!(f, "{}", name.strip_suffix(".csv").unwrap_or(name))
    }
}

/// Raw bytes of one table plus where they came from.
#[derive(Debug, Clone)]
pub struct TableData {
    pub table: TableName,
    pub origin: String,
    pub bytes: Vec<u8>,
}

/// Where input tables come from.
pub trait TableSource {
    /// Read a table. `Ok(None)` means the table is absent.
    fn read(&self, table: TableName) -> Result<Option<TableData>>;

    /// Human-readable description for logs and manifests.
    fn describe(&self) -> String;
}

/// Tables stored as CSV files in one directory.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
    overrides: BTreeMap<TableName, String>,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: BTreeMap<TableName, String>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolved file path of a table.
    pub fn path(&self, table: TableName) -> PathBuf {
        match self.overrides.get(&table) {
            Some(file) if Path::new(file).is_absolute() => PathBuf::from(file),
            Some(file) => self.dir.join(file),
            None => self.dir.join(table.default_file()),
        }
    }
}

impl TableSource for CsvDirectory {
    fn read(&self, table: TableName) -> Result<Option<TableData>> {
        let path = self.path(table);
        if !path.is_file() {
            tracing::debug!(%table, path = %path.display(), "Table file not found");
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(TableData {
            table,
            origin: path.display().to_string(),
            bytes,
        }))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Tables held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTables {
    tables: HashMap<TableName, String>,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, table: TableName, csv: impl Into<String>) -> Self {
        self.tables.insert(table, csv.into());
        self
    }
}

impl TableSource for InMemoryTables {
    fn read(&self, table: TableName) -> Result<Option<TableData>> {
        Ok(self.tables.get(&table).map(|csv| TableData {
            table,
            origin: format!("memory:{}", table.key()),
            bytes: csv.as_bytes().to_vec(),
        }))
    }

    fn describe(&self) -> String {
        "in-memory tables".to_string()
    }
}

/// A typed row of one input table.
pub trait TableRecord: DeserializeOwned {
    const TABLE: TableName;
    /// Header names that must be present.
    const COLUMNS: &'static [&'static str];
}

/// Parse a table into `(row_number, record)` pairs.
///
/// Headers and fields are trimmed; blank fields deserialize as `None`.
/// Row numbers count data rows from 1.
pub fn load<R: TableRecord>(data: &TableData) -> Result<Vec<(usize, R)>> {
    let table = R::TABLE.to_string();
    let csv_error = |source: csv::Error| ConvertError::Csv {
        table: table.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data.bytes.as_slice());

    let headers = reader.headers().map_err(csv_error)?.clone();
    for column in R::COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(ConvertError::MissingColumn {
                table: table.clone(),
                column: (*column).to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for (i, record) in reader.deserialize::<R>().enumerate() {
        rows.push((i + 1, record.map_err(csv_error)?));
    }

    tracing::debug!(table = %table, rows = rows.len(), "Loaded table");
    Ok(rows)
}
