//! Categorical/boolean summary: raw and normalized distributions.

use std::collections::BTreeMap;

use cdr_model::ColumnSummary;
use cdr_model::summary::MAX_VALUE_SAMPLES;

use crate::column_view::{Cell, ColumnView};
use crate::vocabulary::Vocabulary;

/// Bucket label for null/empty cells in the raw distribution.
pub const BLANK_SENTINEL: &str = "(blank)";

/// Count raw literals, normalize against the vocabulary, and collect the
/// unexpected-value bucket. Without a vocabulary every literal counts as
/// its own normalized value and nothing is unexpected.
pub fn summarize_categorical(
    view: &ColumnView,
    vocabulary: Option<&Vocabulary>,
) -> ColumnSummary {
    let mut raw_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut normalized_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut unexpected: BTreeMap<String, u64> = BTreeMap::new();
    let mut unexpected_total = 0u64;

    for cell in &view.cells {
        match cell {
            Cell::Null | Cell::Empty => {
                *raw_counts.entry(BLANK_SENTINEL.to_string()).or_default() += 1;
            }
            Cell::Value(text) => {
                *raw_counts.entry(text.clone()).or_default() += 1;
                match vocabulary {
                    Some(vocabulary) => match vocabulary.canonical_for(text) {
                        Some(canonical) => {
                            *normalized_counts.entry(canonical.to_string()).or_default() += 1;
                        }
                        None => {
                            unexpected_total += 1;
                            if unexpected.len() < MAX_VALUE_SAMPLES
                                || unexpected.contains_key(text)
                            {
                                *unexpected.entry(text.clone()).or_default() += 1;
                            }
                        }
                    },
                    None => {
                        *normalized_counts.entry(text.clone()).or_default() += 1;
                    }
                }
            }
        }
    }

    ColumnSummary::Categorical {
        raw_counts,
        normalized_counts,
        unexpected,
        unexpected_total,
        total: view.row_count(),
    }
}
