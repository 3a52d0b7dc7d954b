use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The columnar engine could not parse the file. This is the single
    /// hard failure boundary; everything downstream assumes a
    /// syntactically valid table.
    #[error("malformed file {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("file {path} has no readable columns")]
    NoColumns { path: PathBuf },

    #[error("failed to read dataset {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("failed to write dataset {path}: {message}")]
    Save { path: PathBuf, message: String },

    #[error("io error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
