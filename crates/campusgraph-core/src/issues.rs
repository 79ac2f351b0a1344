//! Data-quality issues found while converting tables into the graph.
//!
//! Issues never stop a lenient run: the offending value is skipped or the
//! first-seen value is kept. In strict mode the blocking kinds abort.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vocab::Class;

/// Where in the input an issue was found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub table: String,
    /// 1-based data row (header excluded). `None` for derived facts.
    pub row: Option<usize>,
}

impl Location {
    pub fn row(table: impl Into<String>, row: usize) -> Self {
        Self {
            table: table.into(),
            row: Some(row),
        }
    }

    pub fn derived(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            row: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{} row {}", self.table, row),
            None => write!(f, "{}", self.table),
        }
    }
}

/// A single data-quality finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "issue")]
pub enum Issue {
    /// A column needed for a property was blank.
    MissingValue { at: Location, column: String },

    /// A value could not be interpreted.
    InvalidValue {
        at: Location,
        column: String,
        value: String,
        expected: String,
    },

    /// A row found no partner in a join and was not mapped.
    UnmatchedJoin {
        at: Location,
        key: String,
        other_table: String,
    },

    /// A single-valued property was asserted twice with different values.
    /// The first value is kept.
    Conflict {
        at: Location,
        subject: String,
        property: String,
        kept: String,
        rejected: String,
    },

    /// A reference to an entity no table describes; a stub node was created.
    DanglingReference {
        at: Location,
        column: String,
        value: String,
        resolved_as: String,
    },

    /// One key was declared with two incompatible classes.
    KindMismatch {
        at: Location,
        key: String,
        existing: Class,
        requested: Class,
    },
}

impl Issue {
    /// Whether strict mode treats this issue as fatal.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Issue::InvalidValue { .. } | Issue::Conflict { .. } | Issue::KindMismatch { .. }
        )
    }

    pub fn location(&self) -> &Location {
        match self {
            Issue::MissingValue { at, .. }
            | Issue::InvalidValue { at, .. }
            | Issue::UnmatchedJoin { at, .. }
            | Issue::Conflict { at, .. }
            | Issue::DanglingReference { at, .. }
            | Issue::KindMismatch { at, .. } => at,
        }
    }

    /// Short machine-friendly name of the issue kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Issue::MissingValue { .. } => "missing_value",
            Issue::InvalidValue { .. } => "invalid_value",
            Issue::UnmatchedJoin { .. } => "unmatched_join",
            Issue::Conflict { .. } => "conflict",
            Issue::DanglingReference { .. } => "dangling_reference",
            Issue::KindMismatch { .. } => "kind_mismatch",
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingValue { at, column } => write!(f, "{at}: {column} is blank"),
            Issue::InvalidValue {
                at,
                column,
                value,
                expected,
            } => write!(f, "{at}: {column} = {value:?} is not {expected}"),
            Issue::UnmatchedJoin {
                at,
                key,
                other_table,
            } => write!(f, "{at}: no row in {other_table} for {key:?}"),
            Issue::Conflict {
                at,
                subject,
                property,
                kept,
                rejected,
            } => write!(
                f,
                "{at}: {subject} {property} already {kept:?}, ignoring {rejected:?}"
            ),
            Issue::DanglingReference {
                at,
                column,
                value,
                resolved_as,
            } => write!(f, "{at}: {column} {value:?} is unknown, created {resolved_as}"),
            Issue::KindMismatch {
                at,
                key,
                existing,
                requested,
            } => write!(
                f,
                "{at}: {key:?} is a {existing:?}, cannot also be a {requested:?}"
            ),
        }
    }
}
