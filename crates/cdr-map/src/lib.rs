pub mod error;
pub mod normalize;

pub use error::{MapError, Result};
pub use normalize::{
    FIELD_MISMATCH_WARNING_THRESHOLD, MapReport, delimiter_for, normalize, normalize_path,
};
