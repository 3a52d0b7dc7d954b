//! Normalized vocabulary for categorical columns.
//!
//! The synonym table is built once per column definition and reused for
//! every row of that column. Lookups fold case unless the definition
//! opts into case sensitivity.

use std::collections::HashMap;

use cdr_model::{AllowedValues, ColumnDefinition, SemanticType};

/// Default synonym sets for boolean columns without declared values.
const BOOLEAN_DEFAULTS: &[(&str, &[&str])] = &[
    ("true", &["true", "t", "yes", "y", "1"]),
    ("false", &["false", "f", "no", "n", "0"]),
    ("unknown", &["unknown", "unk", "u"]),
];

/// Canonical values plus a normalized variant → canonical lookup.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    canonical: Vec<String>,
    lookup: HashMap<String, String>,
    case_sensitive: bool,
}

impl Vocabulary {
    /// Build the vocabulary for a categorical definition. `None` for
    /// types that are not summarized categorically.
    pub fn for_definition(definition: &ColumnDefinition) -> Option<Self> {
        if !definition.column_type.is_categorical() {
            return None;
        }
        let mut vocabulary = Self {
            canonical: Vec::new(),
            lookup: HashMap::new(),
            case_sensitive: definition.case_sensitive,
        };
        match &definition.allowed_values {
            Some(AllowedValues::List(values)) => {
                for value in values {
                    vocabulary.insert(value, value);
                }
            }
            Some(AllowedValues::Synonyms(map)) => {
                for (canonical, variants) in map {
                    vocabulary.insert(canonical, canonical);
                    for variant in variants {
                        vocabulary.insert(canonical, variant);
                    }
                }
            }
            None if definition.column_type == SemanticType::Boolean => {
                for (canonical, variants) in BOOLEAN_DEFAULTS.iter().copied() {
                    for variant in variants.iter().copied() {
                        vocabulary.insert(canonical, variant);
                    }
                }
            }
            None => return None,
        }
        Some(vocabulary)
    }

    fn insert(&mut self, canonical: &str, variant: &str) {
        if !self.canonical.iter().any(|c| c == canonical) {
            self.canonical.push(canonical.to_string());
        }
        self.lookup
            .insert(self.key(variant), canonical.to_string());
    }

    fn key(&self, value: &str) -> String {
        let trimmed = value.trim();
        if self.case_sensitive {
            trimmed.to_string()
        } else {
            trimmed.to_lowercase()
        }
    }

    /// Canonical value for a raw literal, if it normalizes to one.
    pub fn canonical_for(&self, value: &str) -> Option<&str> {
        self.lookup.get(&self.key(value)).map(String::as_str)
    }

    /// Declared canonical values, in declaration order.
    pub fn canonical(&self) -> &[String] {
        &self.canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdr_model::ColumnDefinition;

    #[test]
    fn case_insensitive_by_default() {
        let definition = ColumnDefinition::new("consented", SemanticType::Enum)
            .with_allowed_values(AllowedValues::List(vec![
                "Yes".to_string(),
                "No".to_string(),
            ]));
        let vocabulary = Vocabulary::for_definition(&definition).unwrap();

        assert_eq!(vocabulary.canonical_for("Yes"), Some("Yes"));
        assert_eq!(vocabulary.canonical_for("yes"), Some("Yes"));
        assert_eq!(vocabulary.canonical_for("YES"), Some("Yes"));
        assert_eq!(vocabulary.canonical_for("maybe"), None);
    }

    #[test]
    fn case_sensitive_opt_out() {
        let mut definition = ColumnDefinition::new("consented", SemanticType::Enum)
            .with_allowed_values(AllowedValues::List(vec!["Yes".to_string()]));
        definition.case_sensitive = true;
        let vocabulary = Vocabulary::for_definition(&definition).unwrap();

        assert_eq!(vocabulary.canonical_for("Yes"), Some("Yes"));
        assert_eq!(vocabulary.canonical_for("yes"), None);
    }

    #[test]
    fn synonym_map_normalizes_variants() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("Female".to_string(), vec!["f".to_string(), "2".to_string()]);
        let definition = ColumnDefinition::new("sexAtBirth", SemanticType::Enum)
            .with_allowed_values(AllowedValues::Synonyms(map));
        let vocabulary = Vocabulary::for_definition(&definition).unwrap();

        assert_eq!(vocabulary.canonical_for("F"), Some("Female"));
        assert_eq!(vocabulary.canonical_for("2"), Some("Female"));
        assert_eq!(vocabulary.canonical_for("female"), Some("Female"));
    }

    #[test]
    fn boolean_defaults_apply_without_declared_values() {
        let definition = ColumnDefinition::new("onStudy", SemanticType::Boolean);
        let vocabulary = Vocabulary::for_definition(&definition).unwrap();

        assert_eq!(vocabulary.canonical_for("Y"), Some("true"));
        assert_eq!(vocabulary.canonical_for("0"), Some("false"));
        assert_eq!(vocabulary.canonical_for("UNK"), Some("unknown"));
    }
}
