//! Type-dispatched column summaries.

mod categorical;
mod date;
mod numeric;

use cdr_model::{ColumnDefinition, ColumnSummary, SemanticType};

use crate::column_view::ColumnView;
use crate::vocabulary::Vocabulary;

pub use categorical::BLANK_SENTINEL;

/// Compute the summary matching the column's semantic type.
///
/// Identifier columns get the text summary: distinct and populated counts
/// only, never values.
pub fn summarize(view: &ColumnView, definition: &ColumnDefinition) -> ColumnSummary {
    match definition.column_type {
        SemanticType::Number
        | SemanticType::Int
        | SemanticType::Float
        | SemanticType::Year => {
            let include_values = definition.summarizers.iter().any(|s| s == "histogram");
            numeric::summarize_numeric(view, include_values)
        }
        SemanticType::Date => date::summarize_date(view),
        SemanticType::Enum | SemanticType::Boolean => {
            categorical::summarize_categorical(view, Vocabulary::for_definition(definition).as_ref())
        }
        SemanticType::Id | SemanticType::String => text_summary(view),
    }
}

fn text_summary(view: &ColumnView) -> ColumnSummary {
    let mut distinct = std::collections::HashSet::new();
    let mut populated = 0u64;
    for (value, _) in view.populated() {
        populated += 1;
        distinct.insert(value);
    }
    ColumnSummary::Text {
        distinct_count: distinct.len() as u64,
        populated_count: populated,
    }
}
