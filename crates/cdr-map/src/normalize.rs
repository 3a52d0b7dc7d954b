//! Streaming header normalization.
//!
//! Rewrites a raw upload so its header matches the canonical schema:
//! declared renames first, then case correction against the column
//! definitions. Data rows stream through record-by-record — uploads are
//! observed at multi-gigabyte scale, so the file is never buffered whole.
//! Values are not transformed; rows are re-emitted through the writer,
//! which is also what normalizes line endings to `\n`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, warn};

use cdr_model::{
    CaseInsensitiveLookup, ColumnDefinition, ResolvedMapping, Severity, ValidationFinding,
};

use crate::error::{MapError, Result};

/// Field-count mismatches tolerated before the report carries a
/// structural warning.
pub const FIELD_MISMATCH_WARNING_THRESHOLD: u64 = 10;

/// What the normalization pass did to one file.
#[derive(Debug, Clone)]
pub struct MapReport {
    /// Final header, in file order.
    pub headers: Vec<String>,
    /// Renames applied, as (raw header, canonical name) pairs.
    pub renamed: Vec<(String, String)>,
    /// Data rows streamed through.
    pub data_rows: u64,
    /// Rows whose field count differed from the header's.
    pub field_count_mismatches: u64,
}

impl MapReport {
    /// Structural warning once mismatches pass the threshold. Surfaced
    /// alongside per-column findings, never instead of them.
    pub fn structural_warning(&self) -> Option<ValidationFinding> {
        if self.field_count_mismatches <= FIELD_MISMATCH_WARNING_THRESHOLD {
            return None;
        }
        Some(
            ValidationFinding::failed(
                "malformed_rows",
                "",
                Severity::Warning,
                format!(
                    "{} rows had a field count different from the header ({} columns); \
                     short rows were padded and long rows truncated",
                    self.field_count_mismatches,
                    self.headers.len()
                ),
                self.field_count_mismatches,
            )
            .with_metadata(
                "header_field_count",
                serde_json::Value::from(self.headers.len()),
            ),
        )
    }
}

/// Delimiter by filename extension: `.tsv` is tab, everything else comma.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Normalize one upload from `input` into `output`.
///
/// Only the header is interpreted. Unmapped headers are case-corrected to
/// the canonical definition spelling when one matches case-insensitively;
/// with an empty rename table this degrades to passthrough.
pub fn normalize<R: Read, W: Write>(
    input: R,
    output: W,
    mapping: &ResolvedMapping,
    definitions: &[ColumnDefinition],
    delimiter: u8,
) -> Result<MapReport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(input);
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(output);

    let raw_headers = reader.headers()?.clone();
    if raw_headers.iter().all(|h| clean_header(h).is_empty()) {
        return Err(MapError::EmptyFile);
    }

    let canonical = CaseInsensitiveLookup::new(definitions.iter().map(|d| d.name.as_str()));
    let mut headers = Vec::with_capacity(raw_headers.len());
    let mut renamed = Vec::new();
    for raw in raw_headers.iter() {
        let cleaned = clean_header(raw);
        let target = match mapping.target_for(&cleaned) {
            Some(target) => {
                renamed.push((cleaned.clone(), target.to_string()));
                target.to_string()
            }
            None => canonical
                .get(&cleaned)
                .map(str::to_string)
                .unwrap_or(cleaned),
        };
        headers.push(target);
    }
    writer.write_record(&headers)?;
    debug!(
        columns = headers.len(),
        renames = renamed.len(),
        passthrough = mapping.is_passthrough(),
        "normalized header"
    );

    let expected = headers.len();
    let mut data_rows = 0u64;
    let mut mismatches = 0u64;
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        data_rows += 1;
        if record.len() == expected {
            writer.write_record(&record)?;
            continue;
        }
        mismatches += 1;
        // Keep the table rectangular: pad short rows, truncate long ones.
        let mut row: Vec<&str> = record.iter().take(expected).collect();
        row.resize(expected, "");
        writer.write_record(&row)?;
    }
    writer.flush()?;

    if mismatches > FIELD_MISMATCH_WARNING_THRESHOLD {
        warn!(
            mismatches,
            data_rows, "field-count mismatches exceeded threshold"
        );
    }

    Ok(MapReport {
        headers,
        renamed,
        data_rows,
        field_count_mismatches: mismatches,
    })
}

/// Normalize `input` into `output`, picking the delimiter from the input
/// filename.
pub fn normalize_path(
    input: &Path,
    output: &Path,
    mapping: &ResolvedMapping,
    definitions: &[ColumnDefinition],
) -> Result<MapReport> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    normalize(reader, writer, mapping, definitions, delimiter_for(input))
}

/// Trim whitespace and a leading byte-order mark from a header cell.
fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}
