//! Provenance column names shared across stages.
//!
//! The materializer stamps every row with [`SOURCE_ROW_COLUMN`] at load
//! time; the combiner adds [`SOURCE_FILE_COLUMN`] when two or more
//! physical uploads are merged into one logical table. Validators probe
//! for the file column to decide whether per-row provenance is
//! reportable.

/// Originating physical upload, present only on combined datasets.
pub const SOURCE_FILE_COLUMN: &str = "source_file_id";

/// Monotonic 1-based row number assigned at materialization.
pub const SOURCE_ROW_COLUMN: &str = "source_row_number";
