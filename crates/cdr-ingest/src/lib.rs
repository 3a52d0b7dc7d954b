pub mod cell;
pub mod error;
pub mod materialize;
pub mod retry;
pub mod store;

pub use cell::{cell_to_f64, cell_to_string, cell_to_u64, is_null};
pub use error::{IngestError, Result};
pub use materialize::{
    ColumnarDataset, DEFAULT_INFER_SCHEMA_ROWS, MaterializeOptions, delimiter_for, materialize,
};
pub use retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, with_retry};
pub use store::{DATASET_FILE_NAME, dataset_path, open, save};
