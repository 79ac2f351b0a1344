//! Collection of data-quality issues raised during mapping.

use std::collections::BTreeMap;

use campusgraph_core::Issue;

use crate::error::{ConvertError, Result};

/// Accumulates issues in the order they are found.
///
/// In strict mode the first blocking issue is returned as an error
/// instead of being recorded.
#[derive(Debug, Default)]
pub struct Diagnostics {
    strict: bool,
    issues: Vec<Issue>,
}

impl Diagnostics {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            issues: Vec::new(),
        }
    }

    pub fn report(&mut self, issue: Issue) -> Result<()> {
        if self.strict && issue.is_blocking() {
            tracing::error!(kind = issue.kind(), "{issue}");
            return Err(ConvertError::Strict(Box::new(issue)));
        }
        tracing::warn!(kind = issue.kind(), "{issue}");
        self.issues.push(issue);
        Ok(())
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Issue count per kind.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        count_by_kind(&self.issues)
    }
}

pub fn count_by_kind(issues: &[Issue]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for issue in issues {
        *counts.entry(issue.kind().to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusgraph_core::issues::Location;

    fn missing() -> Issue {
        Issue::MissingValue {
            at: Location::row("Students", 1),
            column: "Year".to_string(),
        }
    }

    fn invalid() -> Issue {
        Issue::InvalidValue {
            at: Location::row("Students", 2),
            column: "Year".to_string(),
            value: "soon".to_string(),
            expected: "an integer".to_string(),
        }
    }

    #[test]
    fn test_lenient_records_everything() {
        let mut diagnostics = Diagnostics::new(false);
        diagnostics.report(missing()).unwrap();
        diagnostics.report(invalid()).unwrap();
        assert_eq!(diagnostics.issues().len(), 2);
        assert_eq!(diagnostics.counts().get("invalid_value"), Some(&1));
    }

    #[test]
    fn test_strict_aborts_on_blocking_only() {
        let mut diagnostics = Diagnostics::new(true);
        diagnostics.report(missing()).unwrap();
        let err = diagnostics.report(invalid()).unwrap_err();
        assert!(matches!(err, ConvertError::Strict(_)));
        assert_eq!(diagnostics.into_issues().len(), 1);
    }
}
