//! CSV to columnar dataset materialization.
//!
//! Loads a normalized file into a polars `DataFrame` with per-column type
//! inference sampled over the first N rows, and stamps every row with a
//! monotonic 1-based row number. The row number is the canonical row
//! identity everything downstream reports against; the frame is read-only
//! after load.

use std::path::Path;

use polars::prelude::{CsvParseOptions, CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use cdr_model::SOURCE_ROW_COLUMN;

use crate::error::{IngestError, Result};

/// Rows sampled for schema inference by default.
pub const DEFAULT_INFER_SCHEMA_ROWS: usize = 100_000;

/// Options for one materialization.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    /// Rows sampled for type inference.
    pub infer_schema_rows: usize,
    /// Read every column as text. Used for lossless pre-mapping
    /// round-trips; typed inference is for post-mapping validation.
    pub force_text: bool,
    /// Delimiter override; inferred from the extension when `None`.
    pub delimiter: Option<u8>,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            infer_schema_rows: DEFAULT_INFER_SCHEMA_ROWS,
            force_text: false,
            delimiter: None,
        }
    }
}

impl MaterializeOptions {
    #[must_use]
    pub fn with_force_text(mut self, force_text: bool) -> Self {
        self.force_text = force_text;
        self
    }

    #[must_use]
    pub fn with_infer_schema_rows(mut self, rows: usize) -> Self {
        self.infer_schema_rows = rows;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}

/// One physical file, materialized.
///
/// Column types are inferred once at load and frozen; the frame carries
/// the `source_row_number` column and is not mutated afterwards.
#[derive(Debug, Clone)]
pub struct ColumnarDataset {
    file_id: String,
    df: DataFrame,
}

impl ColumnarDataset {
    /// Wrap an already-loaded frame, e.g. one reopened from storage.
    /// The frame must already carry `source_row_number`.
    pub fn from_frame(file_id: impl Into<String>, df: DataFrame) -> Self {
        Self {
            file_id: file_id.into(),
            df,
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }
}

/// Delimiter by filename extension: `.tsv` is tab, everything else comma.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Materialize a normalized file into a columnar dataset.
pub fn materialize(
    path: &Path,
    file_id: impl Into<String>,
    options: &MaterializeOptions,
) -> Result<ColumnarDataset> {
    let file_id = file_id.into();
    let delimiter = options.delimiter.unwrap_or_else(|| delimiter_for(path));
    // Inference length 0 reads every column as a string.
    let infer_rows = if options.force_text {
        0
    } else {
        options.infer_schema_rows
    };
    let parse_options = CsvParseOptions::default().with_separator(delimiter);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_rows))
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::NoColumns {
            path: path.to_path_buf(),
        });
    }

    // Canonical row identity, 1-based, assigned in load order.
    let df = df
        .with_row_index(SOURCE_ROW_COLUMN.into(), Some(1))
        .map_err(|e| IngestError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        file_id,
        rows = df.height(),
        columns = df.width(),
        force_text = options.force_text,
        "materialized dataset"
    );

    Ok(ColumnarDataset { file_id, df })
}
