//! `range(min, max)`: numeric bound check, inclusive on both ends.

use cdr_model::{RowLocation, Severity, ValidationFinding};

use crate::column_view::ColumnView;

const RULE: &str = "range";

/// Flags rows whose numeric value falls outside `[min, max]`. Cells that
/// do not parse as numbers are skipped here; the numeric summary accounts
/// for them.
pub fn check_range(
    view: &ColumnView,
    min: f64,
    max: f64,
    severity: Severity,
    allow_value_samples: bool,
) -> ValidationFinding {
    let mut affected: Vec<RowLocation> = Vec::new();
    let mut samples: Vec<f64> = Vec::new();

    for (value, location) in view.populated() {
        let Ok(number) = value.parse::<f64>() else {
            continue;
        };
        if number < min || number > max {
            if samples.len() < 10 {
                samples.push(number);
            }
            affected.push(location.clone());
        }
    }

    if affected.is_empty() {
        return ValidationFinding::passed(RULE, &view.name, severity)
            .with_metadata("min", serde_json::Value::from(min))
            .with_metadata("max", serde_json::Value::from(max));
    }

    let affected_count = affected.len() as u64;
    let mut finding = ValidationFinding::failed(
        RULE,
        &view.name,
        severity,
        format!("{affected_count} values outside range [{min}, {max}]"),
        affected_count,
    )
    .with_rows(affected)
    .with_metadata("min", serde_json::Value::from(min))
    .with_metadata("max", serde_json::Value::from(max));
    if allow_value_samples {
        finding = finding.with_metadata("examples", serde_json::Value::from(samples));
    }
    finding
}
