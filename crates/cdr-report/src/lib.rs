//! Result aggregation: per-file and per-submission rollups.
//!
//! Pure functions of their inputs. Re-running aggregation over unchanged
//! validations yields bit-identical summaries; nothing here touches a
//! clock, a counter, or any other ambient state.

use tracing::debug;

use cdr_model::{ColumnValidation, FileSummary, SubmissionSummary};

/// Roll one file's column validations into a file summary.
///
/// Completeness is the mean over columns of populated/total rows;
/// validity is the mean over columns of rows untouched by error
/// findings. A file with no columns reports zero for both.
pub fn aggregate_file(file_id: &str, validations: &[ColumnValidation]) -> FileSummary {
    let column_count = validations.len() as u64;
    let row_count = validations
        .iter()
        .map(|v| v.stats.row_count)
        .max()
        .unwrap_or(0);

    let mut completeness_sum = 0.0;
    let mut validity_sum = 0.0;
    let mut columns_with_errors = 0u64;
    let mut columns_with_warnings = 0u64;
    for validation in validations {
        completeness_sum += validation.stats.completeness();
        validity_sum += if validation.stats.row_count == 0 {
            0.0
        } else {
            validation.valid_rows() as f64 / validation.stats.row_count as f64
        };
        if validation.has_errors() {
            columns_with_errors += 1;
        } else if validation.has_warnings() {
            columns_with_warnings += 1;
        }
    }

    let summary = FileSummary {
        file_id: file_id.to_string(),
        row_count,
        column_count,
        completeness_pct: percentage(completeness_sum, column_count),
        validity_pct: percentage(validity_sum, column_count),
        columns_with_errors,
        columns_with_warnings,
    };
    debug!(
        file_id,
        completeness = summary.completeness_pct,
        validity = summary.validity_pct,
        "aggregated file"
    );
    summary
}

/// Roll per-file summaries into a submission summary.
pub fn aggregate_submission(files: &[FileSummary]) -> SubmissionSummary {
    let file_count = files.len() as u64;
    let completeness_sum: f64 = files.iter().map(|f| f.completeness_pct).sum();
    let validity_sum: f64 = files.iter().map(|f| f.validity_pct).sum();

    SubmissionSummary {
        file_count,
        total_rows: files.iter().map(|f| f.row_count).sum(),
        total_columns: files.iter().map(|f| f.column_count).sum(),
        completeness_pct: mean(completeness_sum, file_count),
        validity_pct: mean(validity_sum, file_count),
        files_with_errors: files.iter().filter(|f| f.columns_with_errors > 0).count() as u64,
        files_with_warnings: files
            .iter()
            .filter(|f| f.columns_with_errors == 0 && f.columns_with_warnings > 0)
            .count() as u64,
    }
}

fn percentage(sum_of_ratios: f64, count: u64) -> f64 {
    mean(sum_of_ratios * 100.0, count)
}

fn mean(sum: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}
