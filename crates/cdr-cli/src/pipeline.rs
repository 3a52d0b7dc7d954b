//! The five-stage pipeline over one submission directory.
//!
//! Each physical upload is normalized and materialized on its own;
//! uploads for the same table are combined into one logical dataset;
//! validation runs per canonical column with cross-table lookups served
//! from the already-combined siblings; aggregation rolls the results up.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span, warn};

use cdr_combine::{CombinedDataset, combine};
use cdr_ingest::{ColumnarDataset, MaterializeOptions, materialize};
use cdr_map::normalize_path;
use cdr_model::{ColumnDefinition, MappingSpec, ResolvedMapping};
use cdr_report::{aggregate_file, aggregate_submission};
use cdr_validate::validate_column;

use crate::logging::redact_value;
use crate::types::{
    CheckOutcome, DEFAULT_MAPPING_KEY, DefinitionsDoc, FileIngest, MappingsDoc, TableReport,
};

/// Configuration for one `check` run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub submission_dir: PathBuf,
    pub definitions_path: PathBuf,
    pub mappings_path: Option<PathBuf>,
    /// Persist each table's combined dataset under this directory.
    pub artifacts_dir: Option<PathBuf>,
}

pub fn run_check(config: &CheckConfig) -> Result<CheckOutcome> {
    let definitions = load_definitions(&config.definitions_path)?;
    let mappings = match &config.mappings_path {
        Some(path) => load_mappings(path)?,
        None => MappingsDoc::new(),
    };

    let uploads = discover_uploads(&config.submission_dir)?;
    if uploads.is_empty() {
        return Err(anyhow!(
            "no .csv or .tsv uploads found in {}",
            config.submission_dir.display()
        ));
    }

    // Normalized intermediates live only for the duration of the run.
    let workdir = tempfile::tempdir().context("create working directory")?;

    let mut per_table: BTreeMap<String, Vec<ColumnarDataset>> = BTreeMap::new();
    let mut ingests: BTreeMap<String, Vec<FileIngest>> = BTreeMap::new();
    let mut structural: BTreeMap<String, Vec<cdr_model::ValidationFinding>> = BTreeMap::new();

    for upload in &uploads {
        let file_id = upload
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("unreadable file name: {}", upload.display()))?
            .to_string();
        let table = table_name(&file_id);
        let span = info_span!("ingest", file = %file_id, table = %table);
        let _guard = span.enter();

        let mapping = resolve_table_mapping(&mappings, &table);
        let table_definitions = definitions.get(&table).map(Vec::as_slice).unwrap_or(&[]);

        let normalized = workdir.path().join(&file_id);
        let report = normalize_path(upload, &normalized, &mapping, table_definitions)
            .with_context(|| format!("normalize {file_id}"))?;
        debug!(
            rows = report.data_rows,
            renames = report.renamed.len(),
            mismatches = report.field_count_mismatches,
            "normalized"
        );
        if let Some(warning) = report.structural_warning() {
            structural.entry(table.clone()).or_default().push(
                warning.with_metadata("file_id", serde_json::Value::from(file_id.clone())),
            );
        }

        let dataset = match materialize(&normalized, &file_id, &MaterializeOptions::default()) {
            Ok(dataset) => dataset,
            Err(error) => {
                // The engine's message may embed cell contents.
                warn!(error = redact_value(&error.to_string()), "materialization failed");
                return Err(error).with_context(|| format!("materialize {file_id}"));
            }
        };
        info!(rows = dataset.height(), "ingested");

        ingests.entry(table.clone()).or_default().push(FileIngest {
            file_id,
            data_rows: report.data_rows,
            field_count_mismatches: report.field_count_mismatches,
        });
        per_table.entry(table).or_default().push(dataset);
    }

    // Combine before any validation so cross-table lookups always see a
    // finished sibling dataset.
    let mut combined: BTreeMap<String, CombinedDataset> = BTreeMap::new();
    for (table, datasets) in per_table {
        let dataset = combine(datasets).with_context(|| format!("combine table {table}"))?;
        if let Some(artifacts_dir) = &config.artifacts_dir {
            cdr_ingest::save(dataset.frame(), &artifacts_dir.join(&table))
                .with_context(|| format!("persist table {table}"))?;
        }
        combined.insert(table, dataset);
    }

    let lookup = |table: &str| combined.get(table).cloned();

    let mut tables = Vec::new();
    let mut file_summaries = Vec::new();
    for (table, dataset) in &combined {
        let span = info_span!("validate", table = %table);
        let _guard = span.enter();

        let Some(table_definitions) = definitions.get(table) else {
            warn!("no column definitions for table; skipping validation");
            continue;
        };
        let columns: Vec<_> = table_definitions
            .iter()
            .map(|definition| validate_column(dataset, definition, Some(&lookup)))
            .collect();

        let summary = aggregate_file(table, &columns);
        info!(
            completeness = summary.completeness_pct,
            validity = summary.validity_pct,
            errors = summary.columns_with_errors,
            "validated table"
        );
        file_summaries.push(summary.clone());
        tables.push(TableReport {
            table: table.clone(),
            files: ingests.remove(table).unwrap_or_default(),
            structural: structural.remove(table).unwrap_or_default(),
            columns,
            summary,
        });
    }

    let submission = aggregate_submission(&file_summaries);
    let has_errors = tables.iter().any(|t| t.summary.columns_with_errors > 0);

    Ok(CheckOutcome {
        tables,
        submission,
        has_errors,
    })
}

/// Normalize a single upload in place of the full pipeline.
pub fn run_normalize(
    input: &Path,
    output: &Path,
    definitions_path: &Path,
    mappings_path: Option<&Path>,
) -> Result<cdr_map::MapReport> {
    let definitions = load_definitions(definitions_path)?;
    let mappings = match mappings_path {
        Some(path) => load_mappings(path)?,
        None => MappingsDoc::new(),
    };
    let file_id = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("unreadable file name: {}", input.display()))?;
    let table = table_name(file_id);
    let mapping = resolve_table_mapping(&mappings, &table);
    let table_definitions = definitions.get(&table).map(Vec::as_slice).unwrap_or(&[]);
    normalize_path(input, output, &mapping, table_definitions)
        .with_context(|| format!("normalize {file_id}"))
}

fn load_definitions(path: &Path) -> Result<DefinitionsDoc> {
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("open definitions {}", path.display()))?,
    );
    let doc: BTreeMap<String, Vec<ColumnDefinition>> = serde_json::from_reader(reader)
        .with_context(|| format!("parse definitions {}", path.display()))?;
    Ok(doc)
}

fn load_mappings(path: &Path) -> Result<MappingsDoc> {
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("open mappings {}", path.display()))?,
    );
    let doc: BTreeMap<String, MappingSpec> = serde_json::from_reader(reader)
        .with_context(|| format!("parse mappings {}", path.display()))?;
    Ok(doc)
}

fn resolve_table_mapping(mappings: &MappingsDoc, table: &str) -> ResolvedMapping {
    ResolvedMapping::resolve(mappings.get(table), mappings.get(DEFAULT_MAPPING_KEY))
}

/// Logical table for an upload: the file stem minus a trailing `_<n>`
/// suffix, so `patient_1.csv` and `patient_2.csv` feed one table.
fn table_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    match stem.rsplit_once('_') {
        Some((base, suffix))
            if !base.is_empty() && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base.to_string()
        }
        _ => stem.to_string(),
    }
}

fn discover_uploads(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut uploads = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_upload = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv"));
        if is_upload {
            uploads.push(path);
        }
    }
    uploads.sort();
    Ok(uploads)
}
