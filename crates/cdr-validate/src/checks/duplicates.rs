//! `no_duplicates`: every non-null, non-empty value must occur once.

use std::collections::HashMap;

use cdr_model::{RowLocation, Severity, ValidationFinding};

use crate::column_view::ColumnView;

const RULE: &str = "no_duplicates";

/// Passes iff the distinct non-empty count equals the non-empty count.
/// On failure the affected rows are every row carrying a value that
/// occurs more than once, so a duplicate spanning two source files
/// reports both rows.
pub fn check_duplicates(view: &ColumnView, severity: Severity) -> ValidationFinding {
    let mut occurrences: HashMap<&str, u64> = HashMap::new();
    let mut populated = 0u64;
    for (value, _) in view.populated() {
        populated += 1;
        *occurrences.entry(value).or_default() += 1;
    }
    let distinct = occurrences.len() as u64;

    if distinct == populated {
        return ValidationFinding::passed(RULE, &view.name, severity)
            .with_metadata("distinct_count", serde_json::Value::from(distinct));
    }

    let affected: Vec<RowLocation> = view
        .populated()
        .filter(|(value, _)| occurrences.get(value).copied().unwrap_or(0) > 1)
        .map(|(_, location)| location.clone())
        .collect();
    let affected_count = affected.len() as u64;
    let duplicated_values = occurrences.values().filter(|&&n| n > 1).count() as u64;

    ValidationFinding::failed(
        RULE,
        &view.name,
        severity,
        format!(
            "{affected_count} rows share a duplicated value: {populated} non-empty values, \
             {distinct} distinct"
        ),
        affected_count,
    )
    .with_rows(affected)
    .with_metadata("distinct_count", serde_json::Value::from(distinct))
    .with_metadata("non_empty_count", serde_json::Value::from(populated))
    .with_metadata(
        "duplicated_value_count",
        serde_json::Value::from(duplicated_values),
    )
}
