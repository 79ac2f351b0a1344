//! Interpretation of raw table cells.
//!
//! Each helper takes a trimmed cell (blank cells already `None`) and
//! returns the typed value or a [`FieldError`] the mapper turns into an
//! issue.

use campusgraph_core::Literal;

/// Why a cell could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Missing,
    Invalid { expected: &'static str },
}

pub type FieldResult<T> = std::result::Result<T, FieldError>;

/// Trim and collapse internal runs of whitespace to one space.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Course and programme codes compare case-insensitively.
pub fn code(raw: &str) -> String {
    normalize(raw).to_uppercase()
}

/// A non-blank text value, whitespace-normalized.
pub fn text(value: Option<&str>) -> FieldResult<String> {
    match value.map(normalize) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(FieldError::Missing),
    }
}

/// An integer, also accepting integral floats such as `"12.0"`.
pub fn int(value: Option<&str>) -> FieldResult<i64> {
    let raw = present(value)?;
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
        _ => Err(FieldError::Invalid {
            expected: "an integer",
        }),
    }
}

/// A study period. Spreadsheet exports write these as floats (`"1.0"`);
/// the fractional part is dropped.
pub fn study_period(value: Option<&str>) -> FieldResult<i64> {
    let raw = present(value)?;
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.abs() < 9.0e15 => Ok(f.trunc() as i64),
        _ => Err(FieldError::Invalid {
            expected: "a study period number",
        }),
    }
}

/// The starting year of an academic year: `"2020-2021"` is 2020.
pub fn academic_year(value: Option<&str>) -> FieldResult<i64> {
    let raw = present(value)?;
    let first = raw.split('-').next().unwrap_or(raw).trim();
    int(Some(first)).map_err(|_| FieldError::Invalid {
        expected: "an academic year like 2020-2021",
    })
}

/// A decimal literal such as course credits.
pub fn decimal(value: Option<&str>) -> FieldResult<Literal> {
    let raw = present(value)?;
    Literal::decimal(raw).map_err(|_| FieldError::Invalid {
        expected: "a decimal number",
    })
}

/// The graduation flag: exactly `True` is true, any other value false.
pub fn graduated(value: Option<&str>) -> FieldResult<bool> {
    Ok(present(value)? == "True")
}

/// Teaching assistants are listed among the students with a `TA ` name prefix.
pub fn is_teaching_assistant(name: &str) -> bool {
    name.starts_with("TA ")
}

fn present(value: Option<&str>) -> FieldResult<&str> {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(FieldError::Missing),
    }
}
