//! Per-column validation: state machine, rule dispatch, summary.
//!
//! A column is either MISSING or PRESENT. Missing columns only make
//! sense to conditional-presence rules; every other declared rule is
//! skipped and a single missing-column finding records the state.
//! Present columns get basic stats, then each declared validator in
//! order, then the type-specific summary.

use tracing::debug;

use cdr_combine::CombinedDataset;
use cdr_model::rules::RuleSpecError;
use cdr_model::{
    BasicStats, ColumnDefinition, ColumnValidation, RuleKind, Severity, ValidationFinding,
    ValidatorSpec,
};

use crate::checks::{
    DatasetLookup, check_duplicates, check_presence, check_range, check_reference,
};
use crate::column_view::{ColumnView, basic_stats, column_view, resolve_column};
use crate::summaries::summarize;

/// Rule key used for the missing-column finding.
pub const MISSING_COLUMN_RULE: &str = "column_missing";

/// Validate one canonical column of a dataset.
///
/// `lookup` feeds `in_file` rules; passing `None` makes every reference
/// table unavailable, which degrades those rules to error findings.
pub fn validate_column(
    dataset: &CombinedDataset,
    definition: &ColumnDefinition,
    lookup: Option<&dyn DatasetLookup>,
) -> ColumnValidation {
    let resolved = resolve_column(dataset.frame(), &definition.name);
    let view = resolved.as_deref().and_then(|name| column_view(dataset, name));

    match view {
        Some(view) => validate_present(dataset, definition, &view, lookup),
        None => validate_missing(dataset, definition),
    }
}

fn validate_present(
    dataset: &CombinedDataset,
    definition: &ColumnDefinition,
    view: &ColumnView,
    lookup: Option<&dyn DatasetLookup>,
) -> ColumnValidation {
    let stats = basic_stats(view);
    let mut findings = Vec::with_capacity(definition.validators.len());
    for spec in &definition.validators {
        findings.push(run_rule(dataset, definition, Some(view), spec, lookup));
    }
    let summary = summarize(view, definition);
    debug!(
        column = %definition.name,
        rows = stats.row_count,
        findings = findings.len(),
        "validated column"
    );
    ColumnValidation {
        column: definition.name.clone(),
        stats,
        findings,
        summary: Some(summary),
    }
}

fn validate_missing(
    dataset: &CombinedDataset,
    definition: &ColumnDefinition,
) -> ColumnValidation {
    let height = dataset.height() as u64;
    let stats = BasicStats {
        row_count: height,
        null_count: height,
        empty_count: 0,
    };

    let conditional: Vec<&ValidatorSpec> = definition
        .validators
        .iter()
        .filter(|spec| {
            matches!(
                RuleKind::parse(spec),
                Ok(RuleKind::RequiredWhen(_) | RuleKind::ForbiddenWhen(_))
            )
        })
        .collect();

    let findings = if conditional.is_empty() {
        vec![ValidationFinding::failed(
            MISSING_COLUMN_RULE,
            &definition.name,
            Severity::Warning,
            "column is not present in the file",
            0,
        )]
    } else {
        conditional
            .into_iter()
            .map(|spec| run_rule(dataset, definition, None, spec, None))
            .collect()
    };

    ColumnValidation {
        column: definition.name.clone(),
        stats,
        findings,
        summary: None,
    }
}

/// Dispatch one parsed rule. Unknown or under-specified rules become
/// error findings so a broken definition is visible in the report
/// instead of aborting the unit.
fn run_rule(
    dataset: &CombinedDataset,
    definition: &ColumnDefinition,
    view: Option<&ColumnView>,
    spec: &ValidatorSpec,
    lookup: Option<&dyn DatasetLookup>,
) -> ValidationFinding {
    let severity = spec.effective_severity();
    let allow_samples = !definition.column_type.is_identifier();

    let kind = match RuleKind::parse(spec) {
        Ok(kind) => kind,
        Err(error) => return spec_error_finding(&definition.name, spec, &error),
    };

    match (&kind, view) {
        (RuleKind::NoDuplicates, Some(view)) => check_duplicates(view, severity),
        (RuleKind::Range { min, max }, Some(view)) => {
            check_range(view, *min, *max, severity, allow_samples)
        }
        (RuleKind::RequiredWhen(condition), _) => {
            check_presence(dataset, &definition.name, view, condition, true, severity)
        }
        (RuleKind::ForbiddenWhen(condition), _) => {
            check_presence(dataset, &definition.name, view, condition, false, severity)
        }
        (RuleKind::InFile { table, column }, Some(view)) => {
            check_reference(view, table, column, lookup, severity, allow_samples)
        }
        // Unreachable through the public entry points: the missing-column
        // path only feeds conditional rules into run_rule.
        (_, None) => ValidationFinding::passed(kind.key(), &definition.name, severity),
    }
}

fn spec_error_finding(
    column: &str,
    spec: &ValidatorSpec,
    error: &RuleSpecError,
) -> ValidationFinding {
    ValidationFinding::failed(
        &spec.rule,
        column,
        Severity::Error,
        format!("invalid validator spec: {error}"),
        0,
    )
}

/// Cross-file entry point: run one `in_file:<table>:<column>` rule string
/// against `column` of `dataset`, resolving the reference table through
/// the caller-supplied lookup.
pub fn validate_cross_file(
    dataset: &CombinedDataset,
    column: &str,
    rule: &str,
    lookup: &dyn DatasetLookup,
) -> ValidationFinding {
    let spec = ValidatorSpec::named(rule);
    let (table, ref_column) = match RuleKind::parse(&spec) {
        Ok(RuleKind::InFile { table, column }) => (table, column),
        Ok(_) => {
            return ValidationFinding::failed(
                rule,
                column,
                Severity::Error,
                format!("'{rule}' is not a cross-file rule"),
                0,
            );
        }
        Err(error) => return spec_error_finding(column, &spec, &error),
    };
    let Some(view) =
        resolve_column(dataset.frame(), column).and_then(|name| column_view(dataset, &name))
    else {
        return ValidationFinding::failed(
            rule,
            column,
            Severity::Error,
            "column is not present in the file",
            0,
        );
    };
    // No definition in scope here, so treat values as sensitive.
    check_reference(
        &view,
        &table,
        &ref_column,
        Some(lookup),
        Severity::Error,
        false,
    )
}
