use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse column definitions: {0}")]
    ColumnDefinitions(#[source] serde_json::Error),

    #[error("malformed mapping document: {0}")]
    MappingDocument(#[source] serde_json::Error),

    #[error("duplicate column definition: {name}")]
    DuplicateColumn { name: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
