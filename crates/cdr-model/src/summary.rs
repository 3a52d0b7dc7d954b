//! Column summaries and file/submission rollups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::finding::ValidationFinding;

/// Cap on sampled unexpected/unparsable literals in a summary.
pub const MAX_VALUE_SAMPLES: usize = 10;

/// Presence counts for one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicStats {
    /// Rows in the dataset.
    pub row_count: u64,
    /// Rows where the cell is null.
    pub null_count: u64,
    /// Rows where the cell is a non-null empty/whitespace string.
    pub empty_count: u64,
}

impl BasicStats {
    /// Rows with actual data.
    pub fn populated(&self) -> u64 {
        self.row_count
            .saturating_sub(self.null_count)
            .saturating_sub(self.empty_count)
    }

    /// Fraction of rows with data, in [0, 1].
    pub fn completeness(&self) -> f64 {
        if self.row_count == 0 {
            0.0
        } else {
            self.populated() as f64 / self.row_count as f64
        }
    }
}

/// Type-dispatched aggregate for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mean: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        median: Option<f64>,
        /// Full value array for histogram binning; omitted unless asked for.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values: Option<Vec<f64>>,
        /// Cells that did not parse as numbers.
        unparsable_count: u64,
    },
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span_days: Option<i64>,
        /// Month bucket (`YYYY-MM`) → row count.
        timeline: BTreeMap<String, u64>,
        unparsable_count: u64,
        /// At most [`MAX_VALUE_SAMPLES`] literals that failed to parse.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        unparsable_samples: Vec<String>,
    },
    Categorical {
        /// Raw literal → count, with a blank sentinel for empty cells.
        raw_counts: BTreeMap<String, u64>,
        /// Canonical value → count after normalization.
        normalized_counts: BTreeMap<String, u64>,
        /// Sampled literals outside the allowed set → count, capped at
        /// [`MAX_VALUE_SAMPLES`] distinct literals.
        unexpected: BTreeMap<String, u64>,
        /// Exact number of rows holding a value outside the allowed set.
        unexpected_total: u64,
        total: u64,
    },
    Text {
        distinct_count: u64,
        populated_count: u64,
    },
}

/// Full validation result for one column of one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnValidation {
    pub column: String,
    pub stats: BasicStats,
    pub findings: Vec<ValidationFinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ColumnSummary>,
}

impl ColumnValidation {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(ValidationFinding::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(ValidationFinding::is_warning)
    }

    /// Rows not flagged by any error finding, for validity accounting.
    pub fn valid_rows(&self) -> u64 {
        let flagged: u64 = self
            .findings
            .iter()
            .filter(|f| f.is_error())
            .map(|f| f.affected_row_count)
            .max()
            .unwrap_or(0);
        self.stats.row_count.saturating_sub(flagged)
    }
}

/// Completeness/validity rollup for one physical file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file_id: String,
    pub row_count: u64,
    pub column_count: u64,
    /// Mean over columns of populated/total, as a percentage.
    pub completeness_pct: f64,
    /// Mean over columns of valid/total, as a percentage.
    pub validity_pct: f64,
    pub columns_with_errors: u64,
    /// Columns whose findings are warnings only.
    pub columns_with_warnings: u64,
}

/// Rollup over every file of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub file_count: u64,
    pub total_rows: u64,
    pub total_columns: u64,
    pub completeness_pct: f64,
    pub validity_pct: f64,
    pub files_with_errors: u64,
    pub files_with_warnings: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_stats_completeness() {
        let stats = BasicStats {
            row_count: 10,
            null_count: 2,
            empty_count: 3,
        };
        assert_eq!(stats.populated(), 5);
        assert!((stats.completeness() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dataset_has_zero_completeness() {
        assert_eq!(BasicStats::default().completeness(), 0.0);
    }
}
