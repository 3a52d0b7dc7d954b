//! Numeric summary: min/max/mean/median plus optional raw values.

use cdr_model::ColumnSummary;

use crate::column_view::ColumnView;

pub fn summarize_numeric(view: &ColumnView, include_values: bool) -> ColumnSummary {
    let mut values: Vec<f64> = Vec::new();
    let mut unparsable = 0u64;
    for (text, _) in view.populated() {
        match text.parse::<f64>() {
            Ok(number) => values.push(number),
            Err(_) => unparsable += 1,
        }
    }

    if values.is_empty() {
        return ColumnSummary::Numeric {
            min: None,
            max: None,
            mean: None,
            median: None,
            values: None,
            unparsable_count: unparsable,
        };
    }

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let median = if sorted.len() % 2 == 1 {
        sorted[sorted.len() / 2]
    } else {
        let upper = sorted.len() / 2;
        (sorted[upper - 1] + sorted[upper]) / 2.0
    };

    ColumnSummary::Numeric {
        min: Some(min),
        max: Some(max),
        mean: Some(mean),
        median: Some(median),
        values: include_values.then_some(values),
        unparsable_count: unparsable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_view::Cell;
    use cdr_model::RowLocation;

    fn view(values: &[&str]) -> ColumnView {
        ColumnView {
            name: "age".to_string(),
            cells: values.iter().map(|v| Cell::Value((*v).to_string())).collect(),
            locations: (1..=values.len() as u64)
                .map(|n| RowLocation::new(None, n))
                .collect(),
        }
    }

    #[test]
    fn computes_order_statistics() {
        let summary = summarize_numeric(&view(&["25", "150", "30", "x"]), false);
        match summary {
            ColumnSummary::Numeric {
                min,
                max,
                mean,
                median,
                values,
                unparsable_count,
            } => {
                assert_eq!(min, Some(25.0));
                assert_eq!(max, Some(150.0));
                assert!((mean.unwrap() - 68.333).abs() < 0.001);
                assert_eq!(median, Some(30.0));
                assert!(values.is_none());
                assert_eq!(unparsable_count, 1);
            }
            other => panic!("expected numeric summary, got {other:?}"),
        }
    }

    #[test]
    fn even_count_median_averages_middle_pair() {
        let summary = summarize_numeric(&view(&["1", "2", "3", "4"]), true);
        match summary {
            ColumnSummary::Numeric { median, values, .. } => {
                assert_eq!(median, Some(2.5));
                assert_eq!(values.unwrap().len(), 4);
            }
            other => panic!("expected numeric summary, got {other:?}"),
        }
    }
}
