//! Mapping specs: cohort-specific column renames.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One source → target rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_column: String,
    pub target_column: String,
}

/// Mapping document for one (cohort group, file type).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSpec {
    #[serde(default)]
    pub column_mappings: Vec<ColumnMapping>,
}

impl MappingSpec {
    /// Passthrough spec: no renames, casing normalization only.
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn is_passthrough(&self) -> bool {
        self.column_mappings.is_empty()
    }
}

/// Mapping resolved for a concrete (cohort group, file type) pair.
///
/// Rename lookups are case-insensitive; the table is built once at
/// resolution and reused for the whole file.
#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    renames: BTreeMap<String, String>,
}

impl ResolvedMapping {
    /// Resolution order: the specific document for the pair, else the
    /// cohort-default document, else passthrough.
    pub fn resolve(specific: Option<&MappingSpec>, default: Option<&MappingSpec>) -> Self {
        let spec = specific.or(default);
        let mut renames = BTreeMap::new();
        if let Some(spec) = spec {
            for mapping in &spec.column_mappings {
                renames.insert(
                    mapping.source_column.trim().to_ascii_lowercase(),
                    mapping.target_column.trim().to_string(),
                );
            }
        }
        Self { renames }
    }

    pub fn passthrough() -> Self {
        Self {
            renames: BTreeMap::new(),
        }
    }

    /// Target name for a raw header, if a rename is declared for it.
    pub fn target_for(&self, source_header: &str) -> Option<&str> {
        self.renames
            .get(&source_header.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_passthrough(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }
}

/// Load a mapping document from JSON. Malformed documents are terminal.
pub fn load_mapping_spec(reader: impl Read) -> Result<MappingSpec> {
    serde_json::from_reader(reader).map_err(ModelError::MappingDocument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_specific_over_default() {
        let specific = MappingSpec {
            column_mappings: vec![ColumnMapping {
                source_column: "sitePatientId".to_string(),
                target_column: "cohortPatientId".to_string(),
            }],
        };
        let default = MappingSpec {
            column_mappings: vec![ColumnMapping {
                source_column: "sitePatientId".to_string(),
                target_column: "patientId".to_string(),
            }],
        };
        let resolved = ResolvedMapping::resolve(Some(&specific), Some(&default));
        assert_eq!(resolved.target_for("SITEPATIENTID"), Some("cohortPatientId"));
    }

    #[test]
    fn missing_documents_fall_back_to_passthrough() {
        let resolved = ResolvedMapping::resolve(None, None);
        assert!(resolved.is_passthrough());
        assert_eq!(resolved.target_for("anything"), None);
    }

    #[test]
    fn malformed_document_is_terminal() {
        let err = load_mapping_spec("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::MappingDocument(_)));
    }
}
