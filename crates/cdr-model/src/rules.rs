//! Validator rule specs and their parsed forms.
//!
//! Specs arrive as loosely-typed JSON objects inside a column definition.
//! `RuleKind::parse` turns one into a closed union exactly once; a spec
//! missing its required parameters parses to an error value that the
//! engine reports as an error-severity finding instead of aborting the
//! unit.

use serde::{Deserialize, Serialize};

use crate::finding::Severity;

/// Raw validator spec as declared in a column definition document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorSpec {
    /// Rule name, e.g. `no_duplicates`, `range`, `in_file:patient:cohortPatientId`.
    pub rule: String,
    /// Severity override; rules default to error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Lower bound for `range`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for `range`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Sibling column that must be absent, for conditional presence rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absent: Option<String>,
    /// Sibling column that must be present, for conditional presence rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<String>,
}

impl ValidatorSpec {
    pub fn named(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            severity: None,
            min: None,
            max: None,
            absent: None,
            present: None,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Effective severity for findings produced by this spec.
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or(Severity::Error)
    }
}

/// Condition for `required_when` / `forbidden_when`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceCondition {
    /// The named sibling column is absent or entirely empty.
    Absent(String),
    /// The named sibling column exists with at least one value.
    Present(String),
}

impl PresenceCondition {
    /// The sibling column the condition observes.
    pub fn column(&self) -> &str {
        match self {
            Self::Absent(name) | Self::Present(name) => name,
        }
    }
}

/// Closed union of rule kinds the engine knows how to run.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Distinct non-null count must equal non-null count.
    NoDuplicates,
    /// Numeric values must fall inside `[min, max]`.
    Range { min: f64, max: f64 },
    /// Column must hold data when the condition is met.
    RequiredWhen(PresenceCondition),
    /// Column must be empty when the condition is met.
    ForbiddenWhen(PresenceCondition),
    /// Every value must appear in `<table>.<column>` of a sibling table.
    InFile { table: String, column: String },
}

/// Why a spec could not be turned into a runnable rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleSpecError {
    #[error("unknown rule: {0}")]
    UnknownRule(String),
    #[error("rule {rule} is missing required parameter {parameter}")]
    MissingParameter {
        rule: &'static str,
        parameter: &'static str,
    },
    #[error("in_file rule must be written as in_file:<table>:<column>, got {0}")]
    MalformedReference(String),
}

impl RuleKind {
    /// Resolve a raw spec into a runnable rule.
    pub fn parse(spec: &ValidatorSpec) -> Result<Self, RuleSpecError> {
        let name = spec.rule.trim();
        if let Some(reference) = name.strip_prefix("in_file:") {
            let mut parts = reference.splitn(2, ':');
            let table = parts.next().unwrap_or("").trim();
            let column = parts.next().unwrap_or("").trim();
            if table.is_empty() || column.is_empty() {
                return Err(RuleSpecError::MalformedReference(spec.rule.clone()));
            }
            return Ok(Self::InFile {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
        match name {
            "no_duplicates" => Ok(Self::NoDuplicates),
            "range" => {
                let min = spec.min.ok_or(RuleSpecError::MissingParameter {
                    rule: "range",
                    parameter: "min",
                })?;
                let max = spec.max.ok_or(RuleSpecError::MissingParameter {
                    rule: "range",
                    parameter: "max",
                })?;
                Ok(Self::Range { min, max })
            }
            "required_when" => Ok(Self::RequiredWhen(parse_condition(spec, "required_when")?)),
            "forbidden_when" => Ok(Self::ForbiddenWhen(parse_condition(
                spec,
                "forbidden_when",
            )?)),
            other => Err(RuleSpecError::UnknownRule(other.to_string())),
        }
    }

    /// Stable key used in findings for this rule.
    pub fn key(&self) -> String {
        match self {
            Self::NoDuplicates => "no_duplicates".to_string(),
            Self::Range { .. } => "range".to_string(),
            Self::RequiredWhen(_) => "required_when".to_string(),
            Self::ForbiddenWhen(_) => "forbidden_when".to_string(),
            Self::InFile { table, column } => format!("in_file:{table}:{column}"),
        }
    }
}

fn parse_condition(
    spec: &ValidatorSpec,
    rule: &'static str,
) -> Result<PresenceCondition, RuleSpecError> {
    match (&spec.absent, &spec.present) {
        (Some(column), _) => Ok(PresenceCondition::Absent(column.clone())),
        (None, Some(column)) => Ok(PresenceCondition::Present(column.clone())),
        (None, None) => Err(RuleSpecError::MissingParameter {
            rule,
            parameter: "absent|present",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_in_file_reference() {
        let spec = ValidatorSpec::named("in_file:patient:cohortPatientId");
        let rule = RuleKind::parse(&spec).unwrap();
        assert_eq!(
            rule,
            RuleKind::InFile {
                table: "patient".to_string(),
                column: "cohortPatientId".to_string(),
            }
        );
        assert_eq!(rule.key(), "in_file:patient:cohortPatientId");
    }

    #[test]
    fn range_without_bounds_is_a_spec_error() {
        let spec = ValidatorSpec::named("range");
        let err = RuleKind::parse(&spec).unwrap_err();
        assert!(matches!(err, RuleSpecError::MissingParameter { .. }));
    }

    #[test]
    fn truncated_in_file_is_malformed() {
        let spec = ValidatorSpec::named("in_file:patient");
        let err = RuleKind::parse(&spec).unwrap_err();
        assert!(matches!(err, RuleSpecError::MalformedReference(_)));
    }

    #[test]
    fn condition_prefers_absent_over_present() {
        let mut spec = ValidatorSpec::named("required_when");
        spec.absent = Some("other".to_string());
        let rule = RuleKind::parse(&spec).unwrap();
        assert_eq!(
            rule,
            RuleKind::RequiredWhen(PresenceCondition::Absent("other".to_string()))
        );
    }
}
