//! Date summary: range, span, month-bucketed timeline.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use cdr_model::ColumnSummary;
use cdr_model::summary::MAX_VALUE_SAMPLES;

use crate::column_view::ColumnView;

/// Accepted literal layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

fn parse_date(text: &str) -> Option<NaiveDate> {
    // Datetime literals contribute their date portion.
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

pub fn summarize_date(view: &ColumnView) -> ColumnSummary {
    let mut min: Option<NaiveDate> = None;
    let mut max: Option<NaiveDate> = None;
    let mut timeline: BTreeMap<String, u64> = BTreeMap::new();
    let mut unparsable = 0u64;
    let mut samples: Vec<String> = Vec::new();

    for (text, _) in view.populated() {
        match parse_date(text) {
            Some(date) => {
                min = Some(min.map_or(date, |m| m.min(date)));
                max = Some(max.map_or(date, |m| m.max(date)));
                *timeline.entry(date.format("%Y-%m").to_string()).or_default() += 1;
            }
            None => {
                unparsable += 1;
                if samples.len() < MAX_VALUE_SAMPLES {
                    samples.push(text.to_string());
                }
            }
        }
    }

    let span_days = match (min, max) {
        (Some(first), Some(last)) => Some((last - first).num_days()),
        _ => None,
    };

    ColumnSummary::Date {
        min: min.map(|d| d.to_string()),
        max: max.map(|d| d.to_string()),
        span_days,
        timeline,
        unparsable_count: unparsable,
        unparsable_samples: samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_view::Cell;
    use cdr_model::RowLocation;

    fn view(values: &[&str]) -> ColumnView {
        ColumnView {
            name: "diagnosisDate".to_string(),
            cells: values.iter().map(|v| Cell::Value((*v).to_string())).collect(),
            locations: (1..=values.len() as u64)
                .map(|n| RowLocation::new(None, n))
                .collect(),
        }
    }

    #[test]
    fn buckets_by_month_and_tracks_span() {
        let summary = summarize_date(&view(&[
            "2023-01-15",
            "2023-01-20",
            "2023-03-01",
            "garbage",
        ]));
        match summary {
            ColumnSummary::Date {
                min,
                max,
                span_days,
                timeline,
                unparsable_count,
                unparsable_samples,
            } => {
                assert_eq!(min.as_deref(), Some("2023-01-15"));
                assert_eq!(max.as_deref(), Some("2023-03-01"));
                assert_eq!(span_days, Some(45));
                assert_eq!(timeline.get("2023-01"), Some(&2));
                assert_eq!(timeline.get("2023-03"), Some(&1));
                assert_eq!(unparsable_count, 1);
                assert_eq!(unparsable_samples, vec!["garbage".to_string()]);
            }
            other => panic!("expected date summary, got {other:?}"),
        }
    }

    #[test]
    fn alternate_layouts_parse() {
        assert_eq!(
            parse_date("03/15/2023"),
            NaiveDate::from_ymd_opt(2023, 3, 15)
        );
        assert_eq!(
            parse_date("2023-03-15T10:30:00"),
            NaiveDate::from_ymd_opt(2023, 3, 15)
        );
        assert_eq!(parse_date("15th of March"), None);
    }
}
