//! Cell-level conversions from polars `AnyValue`.
//!
//! Validators and summaries work on cell values row by row; these helpers
//! give them one consistent view of nulls, text, and numerics regardless
//! of the inferred column dtype.

use polars::prelude::AnyValue;

/// True for a null cell.
pub fn is_null(value: &AnyValue<'_>) -> bool {
    matches!(value, AnyValue::Null)
}

/// String form of a cell. Nulls become the empty string; floats drop
/// trailing zeros so `1.0` and `1` agree across inferred dtypes.
pub fn cell_to_string(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
        AnyValue::Float32(v) => format_float(f64::from(*v)),
        AnyValue::Float64(v) => format_float(*v),
        other => other.to_string(),
    }
}

/// Numeric view of a cell; text parses leniently, everything else is `None`.
pub fn cell_to_f64(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(s.as_str()),
        _ => None,
    }
}

/// Unsigned integer view of a cell, used for the row-number column.
pub fn cell_to_u64(value: &AnyValue<'_>) -> Option<u64> {
    match value {
        AnyValue::UInt8(v) => Some(u64::from(*v)),
        AnyValue::UInt16(v) => Some(u64::from(*v)),
        AnyValue::UInt32(v) => Some(u64::from(*v)),
        AnyValue::UInt64(v) => Some(*v),
        AnyValue::Int8(v) => u64::try_from(*v).ok(),
        AnyValue::Int16(v) => u64::try_from(*v).ok(),
        AnyValue::Int32(v) => u64::try_from(*v).ok(),
        AnyValue::Int64(v) => u64::try_from(*v).ok(),
        _ => None,
    }
}

fn parse_f64(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn format_float(v: f64) -> String {
    let text = format!("{v}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_empty_string() {
        assert_eq!(cell_to_string(&AnyValue::Null), "");
        assert!(is_null(&AnyValue::Null));
    }

    #[test]
    fn floats_drop_trailing_zeros() {
        assert_eq!(cell_to_string(&AnyValue::Float64(150.0)), "150");
        assert_eq!(cell_to_string(&AnyValue::Float64(1.50)), "1.5");
    }

    #[test]
    fn text_parses_as_numeric() {
        assert_eq!(cell_to_f64(&AnyValue::String(" 25 ")), Some(25.0));
        assert_eq!(cell_to_f64(&AnyValue::String("abc")), None);
        assert_eq!(cell_to_f64(&AnyValue::String("")), None);
    }

    #[test]
    fn row_numbers_read_as_u64() {
        assert_eq!(cell_to_u64(&AnyValue::UInt32(17)), Some(17));
        assert_eq!(cell_to_u64(&AnyValue::Int64(-1)), None);
    }
}
