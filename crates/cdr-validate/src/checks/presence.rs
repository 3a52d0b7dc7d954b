//! Conditional presence: `required_when` / `forbidden_when`.
//!
//! Both rules key on whether a named sibling column exists with data.
//! They are the one rule family evaluated even when the target column is
//! missing from the file, because absence is exactly what they reason
//! about.

use cdr_combine::CombinedDataset;
use cdr_model::{PresenceCondition, RowLocation, Severity, ValidationFinding};

use crate::column_view::{ColumnView, sibling_has_data};

/// Evaluate a conditional-presence rule.
///
/// `target` is the view of the validated column, or `None` when the
/// column is absent from the file entirely.
pub fn check_presence(
    dataset: &CombinedDataset,
    column: &str,
    target: Option<&ColumnView>,
    condition: &PresenceCondition,
    required: bool,
    severity: Severity,
) -> ValidationFinding {
    let rule = if required {
        "required_when"
    } else {
        "forbidden_when"
    };
    let sibling = condition.column();
    let sibling_present = sibling_has_data(dataset, sibling);
    let condition_met = match condition {
        PresenceCondition::Absent(_) => !sibling_present,
        PresenceCondition::Present(_) => sibling_present,
    };
    let condition_text = match condition {
        PresenceCondition::Absent(_) => format!("'{sibling}' is absent"),
        PresenceCondition::Present(_) => format!("'{sibling}' is present"),
    };

    if !condition_met {
        return ValidationFinding::passed(rule, column, severity);
    }

    let target_has_data = target.is_some_and(ColumnView::has_data);
    if required {
        if target_has_data {
            ValidationFinding::passed(rule, column, severity)
        } else {
            ValidationFinding::failed(
                rule,
                column,
                severity,
                format!("column is required because {condition_text}, but it has no data"),
                0,
            )
        }
    } else if !target_has_data {
        ValidationFinding::passed(rule, column, severity)
    } else {
        let affected: Vec<RowLocation> = target
            .map(|view| {
                view.populated()
                    .map(|(_, location)| location.clone())
                    .collect()
            })
            .unwrap_or_default();
        let affected_count = affected.len() as u64;
        ValidationFinding::failed(
            rule,
            column,
            severity,
            format!("column must be empty because {condition_text}, but {affected_count} rows have data"),
            affected_count,
        )
        .with_rows(affected)
    }
}
