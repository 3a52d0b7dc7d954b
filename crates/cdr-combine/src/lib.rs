//! Dataset combination: one logical table from many physical uploads.
//!
//! A logical table can span several physical files. Combining is a
//! column-preserving union that tags every row with its originating file
//! id; within each source file the load-time row order is untouched.
//! Duplicate rows across files are preserved — they are a validation
//! finding, not a merge error.

use polars::functions::concat_df_diagonal;
use polars::prelude::{ChunkFull, DataFrame, IntoSeries, StringChunked};
use thiserror::Error;
use tracing::debug;

use cdr_ingest::ColumnarDataset;
use cdr_model::SOURCE_FILE_COLUMN;

#[derive(Debug, Error)]
pub enum CombineError {
    #[error("no datasets to combine")]
    NoDatasets,

    #[error("failed to combine datasets: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, CombineError>;

/// Logical union of one or more per-file datasets for the same table.
#[derive(Debug, Clone)]
pub struct CombinedDataset {
    df: DataFrame,
}

impl CombinedDataset {
    /// Wrap a frame, e.g. one reopened from storage.
    pub fn from_frame(df: DataFrame) -> Self {
        Self { df }
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

    /// True when rows carry per-file provenance, i.e. more than one
    /// physical upload was merged. Validators use this to decide whether
    /// findings can name the originating file.
    pub fn is_combined(&self) -> bool {
        self.df.column(SOURCE_FILE_COLUMN).is_ok()
    }
}

/// Combine per-file datasets into one logical dataset.
///
/// A single dataset is returned unchanged: no synthetic columns, no
/// reordering, no copy of the data beyond moving the frame. With several
/// datasets, each gets a constant `source_file_id` column and the frames
/// are unioned diagonally, so a column present in only some files
/// survives with nulls elsewhere.
pub fn combine(mut datasets: Vec<ColumnarDataset>) -> Result<CombinedDataset> {
    match datasets.len() {
        0 => Err(CombineError::NoDatasets),
        1 => {
            let dataset = datasets.pop().ok_or(CombineError::NoDatasets)?;
            Ok(CombinedDataset {
                df: dataset.into_frame(),
            })
        }
        _ => {
            let mut frames = Vec::with_capacity(datasets.len());
            for dataset in datasets {
                let file_id = dataset.file_id().to_string();
                let mut df = dataset.into_frame();
                let ids = StringChunked::full(
                    SOURCE_FILE_COLUMN.into(),
                    &file_id,
                    df.height(),
                );
                df.with_column(ids.into_series())?;
                frames.push(df);
            }
            let df = concat_df_diagonal(&frames)?;
            debug!(
                files = frames.len(),
                rows = df.height(),
                "combined datasets"
            );
            Ok(CombinedDataset { df })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    use cdr_model::SOURCE_ROW_COLUMN;

    fn dataset(file_id: &str, ids: &[&str]) -> ColumnarDataset {
        let rows: Vec<u32> = (1..=ids.len() as u32).collect();
        let df = DataFrame::new(vec![
            Series::new(SOURCE_ROW_COLUMN.into(), rows).into(),
            Series::new("cohortPatientId".into(), ids.to_vec()).into(),
        ])
        .unwrap();
        ColumnarDataset::from_frame(file_id, df)
    }

    #[test]
    fn single_dataset_is_identity() {
        let input = dataset("a.csv", &["P001", "P002"]);
        let expected = input.frame().clone();
        let combined = combine(vec![input]).unwrap();

        assert!(!combined.is_combined());
        assert_eq!(combined.frame(), &expected);
    }

    #[test]
    fn union_keeps_every_row_and_tags_files() {
        let a = dataset("a.csv", &["P001", "P002"]);
        let b = dataset("b.csv", &["P001", "P003"]);
        let combined = combine(vec![a, b]).unwrap();

        assert!(combined.is_combined());
        assert_eq!(combined.height(), 4);
        let files = combined.frame().column(SOURCE_FILE_COLUMN).unwrap();
        let tags: Vec<String> = (0..4)
            .map(|i| cdr_ingest::cell_to_string(&files.get(i).unwrap()))
            .collect();
        assert_eq!(tags, vec!["a.csv", "a.csv", "b.csv", "b.csv"]);
    }

    #[test]
    fn union_preserves_columns_missing_from_some_files() {
        let a = dataset("a.csv", &["P001"]);
        let mut wide = dataset("b.csv", &["P002"]).into_frame();
        wide.with_column(Series::new("race".into(), vec!["1"]))
            .unwrap();
        let b = ColumnarDataset::from_frame("b.csv", wide);

        let combined = combine(vec![a, b]).unwrap();
        let race = combined.frame().column("race").unwrap();
        assert_eq!(race.null_count(), 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(combine(Vec::new()), Err(CombineError::NoDatasets)));
    }
}
