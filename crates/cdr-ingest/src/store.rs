//! Persistence of the materialized columnar table.
//!
//! Each logical table is stored under its own directory with a uniform
//! file name, so a later re-validation run can reopen the dataset
//! read-only without re-parsing the original upload.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::{DataFrame, ParquetReader, ParquetWriter, SerReader};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Uniform name of the persisted table inside its directory.
pub const DATASET_FILE_NAME: &str = "dataset.parquet";

/// Path of the persisted table for a table directory.
pub fn dataset_path(table_dir: &Path) -> PathBuf {
    table_dir.join(DATASET_FILE_NAME)
}

/// Persist a materialized frame under `table_dir`.
pub fn save(df: &DataFrame, table_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(table_dir).map_err(|e| IngestError::io(table_dir, e))?;
    let path = dataset_path(table_dir);
    let file = File::create(&path).map_err(|e| IngestError::io(&path, e))?;
    let mut df = df.clone();
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| IngestError::Save {
            path: path.clone(),
            message: e.to_string(),
        })?;
    debug!(path = %path.display(), rows = df.height(), "persisted dataset");
    Ok(path)
}

/// Reopen a persisted table read-only.
pub fn open(table_dir: &Path) -> Result<DataFrame> {
    let path = dataset_path(table_dir);
    let file = File::open(&path).map_err(|e| IngestError::io(&path, e))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| IngestError::Open {
            path,
            message: e.to_string(),
        })
}
