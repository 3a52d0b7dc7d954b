//! Report structures written as JSON and rendered by the summary tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cdr_model::{
    ColumnDefinition, ColumnValidation, FileSummary, MappingSpec, SubmissionSummary,
    ValidationFinding,
};

/// Column definition document: table name → definitions.
pub type DefinitionsDoc = BTreeMap<String, Vec<ColumnDefinition>>;

/// Mapping document: table name → mapping spec. The `default` entry
/// applies to tables without a specific one.
pub type MappingsDoc = BTreeMap<String, MappingSpec>;

/// Key of the fallback entry in a [`MappingsDoc`].
pub const DEFAULT_MAPPING_KEY: &str = "default";

/// Ingest accounting for one physical upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileIngest {
    pub file_id: String,
    pub data_rows: u64,
    pub field_count_mismatches: u64,
}

/// Everything produced for one logical table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub files: Vec<FileIngest>,
    /// Structural warnings from normalization, surfaced alongside the
    /// per-column findings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structural: Vec<ValidationFinding>,
    pub columns: Vec<ColumnValidation>,
    pub summary: FileSummary,
}

/// Full outcome of a `check` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub tables: Vec<TableReport>,
    pub submission: SubmissionSummary,
    pub has_errors: bool,
}
