//! Column definitions for the canonical schema.
//!
//! Definitions are loaded from an external JSON document once per run and
//! treated as immutable. Each definition names a canonical column, its
//! semantic type, the values it may take, and the validators/summarizers
//! declared for it.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::rules::ValidatorSpec;

/// Semantic type of a canonical column.
///
/// The type drives validator applicability (numeric rules need a numeric
/// type) and which summary is computed. `Id` additionally marks a column
/// as carrying subject identifiers: findings and summaries must never
/// surface its raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Id,
    Number,
    Int,
    Float,
    Year,
    Enum,
    Boolean,
    Date,
    String,
}

impl SemanticType {
    /// True for types whose values are interpreted numerically.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Number | Self::Int | Self::Float | Self::Year
        )
    }

    /// True for types summarized as a categorical distribution.
    pub fn is_categorical(self) -> bool {
        matches!(self, Self::Enum | Self::Boolean)
    }

    /// True when raw values are sensitive and must stay out of output.
    pub fn is_identifier(self) -> bool {
        matches!(self, Self::Id)
    }
}

/// Allowed values for a categorical column.
///
/// Either a flat list of canonical literals, or a synonym map from each
/// canonical literal to the variants that normalize to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedValues {
    List(Vec<String>),
    Synonyms(BTreeMap<String, Vec<String>>),
}

impl AllowedValues {
    /// Canonical literals in declaration order.
    pub fn canonical(&self) -> Vec<&str> {
        match self {
            Self::List(values) => values.iter().map(String::as_str).collect(),
            Self::Synonyms(map) => map.keys().map(String::as_str).collect(),
        }
    }
}

/// One canonical column of the repository schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Canonical column name.
    pub name: String,
    /// Semantic type.
    #[serde(rename = "type")]
    pub column_type: SemanticType,
    /// Allowed values for enum/boolean columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<AllowedValues>,
    /// Declared validators, run in order.
    #[serde(default)]
    pub validators: Vec<ValidatorSpec>,
    /// Summarizer names; empty means the type default.
    #[serde(default)]
    pub summarizers: Vec<String>,
    /// Opt out of case-insensitive value normalization.
    #[serde(default)]
    pub case_sensitive: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            column_type,
            allowed_values: None,
            validators: Vec::new(),
            summarizers: Vec::new(),
            case_sensitive: false,
        }
    }

    #[must_use]
    pub fn with_allowed_values(mut self, values: AllowedValues) -> Self {
        self.allowed_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, spec: ValidatorSpec) -> Self {
        self.validators.push(spec);
        self
    }
}

/// Load a column definition array from JSON, rejecting duplicate names.
pub fn load_column_definitions(reader: impl Read) -> Result<Vec<ColumnDefinition>> {
    let definitions: Vec<ColumnDefinition> =
        serde_json::from_reader(reader).map_err(ModelError::ColumnDefinitions)?;
    let mut seen = BTreeMap::new();
    for definition in &definitions {
        let key = definition.name.to_ascii_lowercase();
        if seen.insert(key, ()).is_some() {
            return Err(ModelError::DuplicateColumn {
                name: definition.name.clone(),
            });
        }
    }
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_definition_with_synonym_map() {
        let json = r#"[
            {"name": "cohortPatientId", "type": "id",
             "validators": [{"rule": "no_duplicates"}]},
            {"name": "sexAtBirth", "type": "enum",
             "allowed_values": {"Female": ["f"], "Male": ["m"]}}
        ]"#;
        let defs = load_column_definitions(json.as_bytes()).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].column_type, SemanticType::Id);
        assert!(defs[0].column_type.is_identifier());
        match defs[1].allowed_values.as_ref().unwrap() {
            AllowedValues::Synonyms(map) => assert_eq!(map.len(), 2),
            AllowedValues::List(_) => panic!("expected synonym map"),
        }
    }

    #[test]
    fn parses_flat_allowed_value_list() {
        let json = r#"[{"name": "race", "type": "enum", "allowed_values": ["1", "2"]}]"#;
        let defs = load_column_definitions(json.as_bytes()).unwrap();
        match defs[0].allowed_values.as_ref().unwrap() {
            AllowedValues::List(values) => assert_eq!(values.len(), 2),
            AllowedValues::Synonyms(_) => panic!("expected list"),
        }
    }

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let json = r#"[
            {"name": "race", "type": "enum"},
            {"name": "Race", "type": "enum"}
        ]"#;
        let err = load_column_definitions(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateColumn { .. }));
    }
}
