//! Terminal rendering of the check outcome.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use cdr_model::Severity;

use crate::types::CheckOutcome;

pub fn print_summary(outcome: &CheckOutcome) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Files"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Complete %"),
        header_cell("Valid %"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_table_style(&mut table);
    for idx in 1..=7 {
        align_column(&mut table, idx, CellAlignment::Right);
    }

    for report in &outcome.tables {
        table.add_row(vec![
            report.table.clone(),
            report.files.len().to_string(),
            report.summary.row_count.to_string(),
            report.summary.column_count.to_string(),
            format!("{:.1}", report.summary.completeness_pct),
            format!("{:.1}", report.summary.validity_pct),
            report.summary.columns_with_errors.to_string(),
            report.summary.columns_with_warnings.to_string(),
        ]);
    }
    println!("{table}");

    let failed: Vec<_> = outcome
        .tables
        .iter()
        .flat_map(|report| {
            report
                .structural
                .iter()
                .chain(report.columns.iter().flat_map(|c| c.findings.iter()))
                .filter(|finding| !finding.passed)
                .map(move |finding| (report.table.as_str(), finding))
        })
        .collect();
    if failed.is_empty() {
        println!(
            "Submission: {} files, completeness {:.1}%, validity {:.1}%, no findings",
            outcome.submission.file_count,
            outcome.submission.completeness_pct,
            outcome.submission.validity_pct
        );
        return;
    }

    let mut findings = Table::new();
    findings.set_header(vec![
        header_cell("Table"),
        header_cell("Column"),
        header_cell("Rule"),
        header_cell("Severity"),
        header_cell("Rows"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut findings);
    align_column(&mut findings, 4, CellAlignment::Right);
    for (table_name, finding) in &failed {
        findings.add_row(vec![
            Cell::new(table_name),
            Cell::new(&finding.column),
            Cell::new(&finding.rule),
            severity_cell(finding.severity),
            Cell::new(finding.affected_row_count),
            Cell::new(&finding.message),
        ]);
    }
    println!("{findings}");
    println!(
        "Submission: {} files, completeness {:.1}%, validity {:.1}%, {} finding(s)",
        outcome.submission.file_count,
        outcome.submission.completeness_pct,
        outcome.submission.validity_pct,
        failed.len()
    );
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(comfy_table::Attribute::Bold)
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("error").fg(comfy_table::Color::Red),
        Severity::Warning => Cell::new("warning").fg(comfy_table::Color::Yellow),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
