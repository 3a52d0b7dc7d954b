//! Cross-file referential integrity: `in_file:<table>:<column>`.
//!
//! The reference table is another unit's already-finished combined
//! dataset, fetched through a caller-supplied lookup. The engine never
//! reads sibling uploads itself; ordering (reference materialized before
//! this check runs) is the orchestrator's guarantee.

use std::collections::HashSet;

use tracing::debug;

use cdr_combine::CombinedDataset;
use cdr_model::{RowLocation, Severity, ValidationFinding};

use crate::column_view::{ColumnView, column_view, resolve_column};

/// Source of sibling tables' combined datasets.
///
/// Implemented for closures, so callers can pass
/// `|table: &str| -> Option<CombinedDataset>` directly.
pub trait DatasetLookup {
    fn combined(&self, table: &str) -> Option<CombinedDataset>;
}

impl<F> DatasetLookup for F
where
    F: Fn(&str) -> Option<CombinedDataset>,
{
    fn combined(&self, table: &str) -> Option<CombinedDataset> {
        self(table)
    }
}

/// Check every value of `view` against the distinct values of
/// `table.ref_column`. A missing reference table degrades to an
/// error-severity finding with actionable text; it never aborts the unit.
pub fn check_reference(
    view: &ColumnView,
    table: &str,
    ref_column: &str,
    lookup: Option<&dyn DatasetLookup>,
    severity: Severity,
    allow_value_samples: bool,
) -> ValidationFinding {
    let rule = format!("in_file:{table}:{ref_column}");

    let Some(reference) = lookup.and_then(|l| l.combined(table)) else {
        return ValidationFinding::failed(
            &rule,
            &view.name,
            Severity::Error,
            format!(
                "reference table '{table}' is not available; values of '{}' cannot be checked \
                 against {table}.{ref_column}. Upload the '{table}' file for this submission \
                 or remove the rule.",
                view.name
            ),
            0,
        );
    };

    let Some(resolved) = resolve_column(reference.frame(), ref_column) else {
        return ValidationFinding::failed(
            &rule,
            &view.name,
            Severity::Error,
            format!("reference table '{table}' has no column '{ref_column}'"),
            0,
        );
    };
    let Some(reference_view) = column_view(&reference, &resolved) else {
        return ValidationFinding::failed(
            &rule,
            &view.name,
            Severity::Error,
            format!("reference table '{table}' has no column '{ref_column}'"),
            0,
        );
    };

    // Distinct reference values, computed once for all rows.
    let known: HashSet<&str> = reference_view
        .populated()
        .map(|(value, _)| value)
        .collect();
    debug!(table, column = %resolved, distinct = known.len(), "loaded reference values");

    let mut affected: Vec<RowLocation> = Vec::new();
    let mut missing_values: Vec<String> = Vec::new();
    let mut missing_distinct: HashSet<String> = HashSet::new();
    for (value, location) in view.populated() {
        if known.contains(value) {
            continue;
        }
        affected.push(location.clone());
        if missing_distinct.insert(value.to_string()) && missing_values.len() < 10 {
            missing_values.push(value.to_string());
        }
    }

    if affected.is_empty() {
        return ValidationFinding::passed(&rule, &view.name, severity)
            .with_metadata("reference_table", serde_json::Value::from(table))
            .with_metadata("reference_column", serde_json::Value::from(ref_column));
    }

    let affected_count = affected.len() as u64;
    let mut finding = ValidationFinding::failed(
        &rule,
        &view.name,
        severity,
        format!(
            "{affected_count} rows reference values not present in {table}.{ref_column} \
             ({} distinct missing values)",
            missing_distinct.len()
        ),
        affected_count,
    )
    .with_rows(affected)
    .with_metadata("reference_table", serde_json::Value::from(table))
    .with_metadata("reference_column", serde_json::Value::from(ref_column))
    .with_metadata(
        "missing_distinct_count",
        serde_json::Value::from(missing_distinct.len()),
    );
    if allow_value_samples {
        finding = finding.with_metadata("missing_values", serde_json::Value::from(missing_values));
    }
    finding
}
