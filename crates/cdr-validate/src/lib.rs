pub mod checks;
pub mod column_view;
pub mod engine;
pub mod summaries;
pub mod vocabulary;

pub use checks::{DatasetLookup, check_duplicates, check_presence, check_range, check_reference};
pub use column_view::{Cell, ColumnView, basic_stats, column_view, resolve_column};
pub use engine::{MISSING_COLUMN_RULE, validate_column, validate_cross_file};
pub use summaries::{BLANK_SENTINEL, summarize};
pub use vocabulary::Vocabulary;
