//! Row-wise view of one column with provenance.
//!
//! Checks and summaries work on a flat cell vector rather than the
//! underlying chunked arrays; the view is extracted once per column and
//! shared by every rule that runs against it.

use polars::prelude::{AnyValue, DataFrame};

use cdr_combine::CombinedDataset;
use cdr_ingest::{cell_to_string, cell_to_u64, is_null};
use cdr_model::{
    BasicStats, CaseInsensitiveLookup, RowLocation, SOURCE_FILE_COLUMN, SOURCE_ROW_COLUMN,
};

/// One cell, classified the way stats count it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    Empty,
    Value(String),
}

impl Cell {
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(text) => Some(text),
            Self::Null | Self::Empty => None,
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// One column's cells plus the provenance of every row.
#[derive(Debug, Clone)]
pub struct ColumnView {
    /// Spelling of the column inside the frame.
    pub name: String,
    pub cells: Vec<Cell>,
    pub locations: Vec<RowLocation>,
}

impl ColumnView {
    pub fn row_count(&self) -> u64 {
        self.cells.len() as u64
    }

    /// Rows holding actual data, as (cell text, location) pairs.
    pub fn populated(&self) -> impl Iterator<Item = (&str, &RowLocation)> {
        self.cells
            .iter()
            .zip(&self.locations)
            .filter_map(|(cell, location)| cell.value().map(|text| (text, location)))
    }

    pub fn has_data(&self) -> bool {
        self.cells.iter().any(Cell::is_populated)
    }
}

/// Resolve `name` against the frame's data columns, case-insensitively.
/// Provenance columns are not data and never match.
pub fn resolve_column(df: &DataFrame, name: &str) -> Option<String> {
    let names = df
        .get_column_names()
        .into_iter()
        .map(|n| n.as_str())
        .filter(|n| *n != SOURCE_FILE_COLUMN && *n != SOURCE_ROW_COLUMN);
    CaseInsensitiveLookup::new(names)
        .get(name)
        .map(str::to_string)
}

/// Extract the view for a resolved column. `None` when the column is not
/// in the frame.
pub fn column_view(dataset: &CombinedDataset, resolved_name: &str) -> Option<ColumnView> {
    let df = dataset.frame();
    let series = df.column(resolved_name).ok()?;
    let row_numbers = df.column(SOURCE_ROW_COLUMN).ok();
    let file_ids = if dataset.is_combined() {
        df.column(SOURCE_FILE_COLUMN).ok()
    } else {
        None
    };

    let height = df.height();
    let mut cells = Vec::with_capacity(height);
    let mut locations = Vec::with_capacity(height);
    for idx in 0..height {
        let value = series.get(idx).unwrap_or(AnyValue::Null);
        let cell = if is_null(&value) {
            Cell::Null
        } else {
            let text = cell_to_string(&value);
            if text.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Value(text.trim().to_string())
            }
        };
        cells.push(cell);

        let row_number = row_numbers
            .and_then(|col| col.get(idx).ok())
            .and_then(|v| cell_to_u64(&v))
            .unwrap_or(idx as u64 + 1);
        let file_id = file_ids
            .and_then(|col| col.get(idx).ok())
            .map(|v| cell_to_string(&v))
            .filter(|id| !id.is_empty());
        locations.push(RowLocation::new(file_id, row_number));
    }

    Some(ColumnView {
        name: resolved_name.to_string(),
        cells,
        locations,
    })
}

/// Presence counts over the view.
pub fn basic_stats(view: &ColumnView) -> BasicStats {
    let mut stats = BasicStats {
        row_count: view.row_count(),
        ..BasicStats::default()
    };
    for cell in &view.cells {
        match cell {
            Cell::Null => stats.null_count += 1,
            Cell::Empty => stats.empty_count += 1,
            Cell::Value(_) => {}
        }
    }
    stats
}

/// True when the named sibling column exists with at least one value.
/// Conditional-presence rules key on this.
pub fn sibling_has_data(dataset: &CombinedDataset, name: &str) -> bool {
    resolve_column(dataset.frame(), name)
        .and_then(|resolved| column_view(dataset, &resolved))
        .is_some_and(|view| view.has_data())
}
