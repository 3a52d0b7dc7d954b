use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    /// The upload has no header row; nothing downstream can run.
    #[error("file is empty: no header row found")]
    EmptyFile,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
