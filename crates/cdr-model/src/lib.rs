pub mod column;
pub mod error;
pub mod finding;
pub mod lookup;
pub mod mapping;
pub mod provenance;
pub mod rules;
pub mod summary;

pub use column::{AllowedValues, ColumnDefinition, SemanticType, load_column_definitions};
pub use error::{ModelError, Result};
pub use finding::{MAX_AFFECTED_ROWS, RowLocation, Severity, ValidationFinding};
pub use lookup::CaseInsensitiveLookup;
pub use mapping::{ColumnMapping, MappingSpec, ResolvedMapping, load_mapping_spec};
pub use provenance::{SOURCE_FILE_COLUMN, SOURCE_ROW_COLUMN};
pub use rules::{PresenceCondition, RuleKind, ValidatorSpec};
pub use summary::{
    BasicStats, ColumnSummary, ColumnValidation, FileSummary, SubmissionSummary,
};
