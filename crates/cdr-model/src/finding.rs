//! Structured data-quality findings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cap on per-finding provenance rows. Counts are always exact even when
/// the row list is truncated.
pub const MAX_AFFECTED_ROWS: usize = 1000;

/// Finding severity. Errors block acceptance; warnings are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Location of one row in the logical table: the physical upload it came
/// from (absent for an uncombined dataset) and its load-time row number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file_id: Option<String>,
    pub source_row_number: u64,
}

impl RowLocation {
    pub fn new(source_file_id: Option<String>, source_row_number: u64) -> Self {
        Self {
            source_file_id,
            source_row_number,
        }
    }
}

/// Outcome of one rule applied to one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFinding {
    /// Rule key, e.g. `no_duplicates` or `in_file:patient:cohortPatientId`.
    pub rule: String,
    /// Canonical column the rule ran against.
    pub column: String,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
    /// Exact number of rows the rule flagged.
    pub affected_row_count: u64,
    /// Provenance for flagged rows, truncated at [`MAX_AFFECTED_ROWS`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_rows: Vec<RowLocation>,
    /// Rule-specific extras (bounds, reference table, distributions).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ValidationFinding {
    /// A passing finding for a rule that found nothing to flag.
    pub fn passed(rule: impl Into<String>, column: impl Into<String>, severity: Severity) -> Self {
        Self {
            rule: rule.into(),
            column: column.into(),
            passed: true,
            severity,
            message: String::new(),
            affected_row_count: 0,
            affected_rows: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// A failing finding with its affected-row accounting.
    pub fn failed(
        rule: impl Into<String>,
        column: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        affected_row_count: u64,
    ) -> Self {
        Self {
            rule: rule.into(),
            column: column.into(),
            passed: false,
            severity,
            message: message.into(),
            affected_row_count,
            affected_rows: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach provenance rows, enforcing the cap.
    #[must_use]
    pub fn with_rows(mut self, mut rows: Vec<RowLocation>) -> Self {
        rows.truncate(MAX_AFFECTED_ROWS);
        self.affected_rows = rows;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_error(&self) -> bool {
        !self.passed && self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        !self.passed && self.severity == Severity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affected_rows_are_capped_but_count_is_exact() {
        let rows: Vec<RowLocation> = (1..=1500)
            .map(|n| RowLocation::new(Some("upload-1".to_string()), n))
            .collect();
        let finding = ValidationFinding::failed(
            "no_duplicates",
            "cohortPatientId",
            Severity::Error,
            "1500 duplicate rows",
            1500,
        )
        .with_rows(rows);

        assert_eq!(finding.affected_rows.len(), MAX_AFFECTED_ROWS);
        assert_eq!(finding.affected_row_count, 1500);
    }

    #[test]
    fn severity_orders_error_above_warning() {
        assert!(Severity::Error > Severity::Warning);
    }
}
