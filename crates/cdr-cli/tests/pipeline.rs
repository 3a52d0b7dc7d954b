//! End-to-end pipeline tests over real files in a temp directory.

use std::fs;
use std::path::Path;

use cdr_cli::pipeline::{CheckConfig, run_check};

const DEFINITIONS: &str = r#"{
    "patient": [
        {"name": "cohortPatientId", "type": "id",
         "validators": [{"rule": "no_duplicates"}]},
        {"name": "race", "type": "enum", "allowed_values": ["1", "2", "3"]}
    ],
    "observation": [
        {"name": "cohortPatientId", "type": "id",
         "validators": [{"rule": "in_file:patient:cohortPatientId"}]},
        {"name": "age", "type": "int",
         "validators": [{"rule": "range", "min": 0, "max": 120}]}
    ]
}"#;

const MAPPINGS: &str = r#"{
    "patient": {"column_mappings": [
        {"source_column": "sitePatientId", "target_column": "cohortPatientId"}
    ]},
    "observation": {"column_mappings": [
        {"source_column": "sitePatientId", "target_column": "cohortPatientId"}
    ]}
}"#;

fn setup(dir: &Path, files: &[(&str, &str)]) -> CheckConfig {
    let submission = dir.join("submission");
    fs::create_dir_all(&submission).unwrap();
    for (name, contents) in files {
        fs::write(submission.join(name), contents).unwrap();
    }
    let definitions = dir.join("definitions.json");
    fs::write(&definitions, DEFINITIONS).unwrap();
    let mappings = dir.join("mappings.json");
    fs::write(&mappings, MAPPINGS).unwrap();
    CheckConfig {
        submission_dir: submission,
        definitions_path: definitions,
        mappings_path: Some(mappings),
        artifacts_dir: None,
    }
}

fn table<'a>(
    outcome: &'a cdr_cli::types::CheckOutcome,
    name: &str,
) -> &'a cdr_cli::types::TableReport {
    outcome
        .tables
        .iter()
        .find(|t| t.table == name)
        .unwrap_or_else(|| panic!("missing table {name}"))
}

#[test]
fn duplicate_ids_after_mapping_are_reported() {
    // Scenario: raw header uses the site's column name; mapping renames it
    // and no_duplicates runs against the canonical column.
    let dir = tempfile::tempdir().unwrap();
    let config = setup(
        dir.path(),
        &[("patient.csv", "sitePatientId,race\nP001,1\nP002,2\nP001,1\n")],
    );

    let outcome = run_check(&config).unwrap();
    let patient = table(&outcome, "patient");

    let id_column = patient
        .columns
        .iter()
        .find(|c| c.column == "cohortPatientId")
        .unwrap();
    let finding = id_column
        .findings
        .iter()
        .find(|f| f.rule == "no_duplicates")
        .unwrap();
    assert!(!finding.passed);
    assert_eq!(finding.affected_row_count, 2);
    assert!(outcome.has_errors);
}

#[test]
fn two_uploads_combine_and_duplicates_span_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(
        dir.path(),
        &[
            ("patient_1.csv", "sitePatientId,race\nP001,1\nP002,2\n"),
            ("patient_2.csv", "sitePatientId,race\nP001,1\nP003,3\n"),
        ],
    );

    let outcome = run_check(&config).unwrap();
    let patient = table(&outcome, "patient");

    assert_eq!(patient.files.len(), 2);
    assert_eq!(patient.summary.row_count, 4);

    let finding = patient
        .columns
        .iter()
        .find(|c| c.column == "cohortPatientId")
        .unwrap()
        .findings
        .iter()
        .find(|f| f.rule == "no_duplicates")
        .unwrap();
    assert!(!finding.passed);
    assert_eq!(finding.affected_row_count, 2);
    let mut files: Vec<_> = finding
        .affected_rows
        .iter()
        .filter_map(|row| row.source_file_id.clone())
        .collect();
    files.sort();
    files.dedup();
    assert_eq!(files, vec!["patient_1.csv", "patient_2.csv"]);
}

#[test]
fn range_violations_surface_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(
        dir.path(),
        &[
            ("patient.csv", "sitePatientId,race\nP001,1\nP002,2\n"),
            (
                "observation.csv",
                "sitePatientId,age\nP001,25\nP002,150\n",
            ),
        ],
    );

    let outcome = run_check(&config).unwrap();
    let observation = table(&outcome, "observation");

    let finding = observation
        .columns
        .iter()
        .find(|c| c.column == "age")
        .unwrap()
        .findings
        .iter()
        .find(|f| f.rule == "range")
        .unwrap();
    assert!(!finding.passed);
    assert_eq!(finding.affected_row_count, 1);
}

#[test]
fn missing_reference_table_degrades_to_error_finding() {
    // The observation upload references the patient table, which was
    // never uploaded.
    let dir = tempfile::tempdir().unwrap();
    let config = setup(
        dir.path(),
        &[(
            "observation.csv",
            "sitePatientId,age\nP001,25\n",
        )],
    );

    let outcome = run_check(&config).unwrap();
    let observation = table(&outcome, "observation");

    let finding = observation
        .columns
        .iter()
        .find(|c| c.column == "cohortPatientId")
        .unwrap()
        .findings
        .iter()
        .find(|f| f.rule.starts_with("in_file:"))
        .unwrap();
    assert!(!finding.passed);
    assert_eq!(finding.severity, cdr_model::Severity::Error);
    assert!(finding.message.contains("patient"));
}

#[test]
fn cross_file_check_passes_against_uploaded_reference() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(
        dir.path(),
        &[
            ("patient.csv", "sitePatientId,race\nP001,1\nP002,2\n"),
            ("observation.csv", "sitePatientId,age\nP001,25\nP002,30\n"),
        ],
    );

    let outcome = run_check(&config).unwrap();
    let observation = table(&outcome, "observation");

    let finding = observation
        .columns
        .iter()
        .find(|c| c.column == "cohortPatientId")
        .unwrap()
        .findings
        .iter()
        .find(|f| f.rule.starts_with("in_file:"))
        .unwrap();
    assert!(finding.passed);
    assert!(!outcome.has_errors);
}

#[test]
fn artifacts_are_persisted_and_reopenable() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(
        dir.path(),
        &[("patient.csv", "sitePatientId,race\nP001,1\nP002,2\n")],
    );
    let artifacts = dir.path().join("artifacts");
    config.artifacts_dir = Some(artifacts.clone());

    run_check(&config).unwrap();

    let reopened = cdr_ingest::open(&artifacts.join("patient")).unwrap();
    assert_eq!(reopened.height(), 2);
    assert!(
        reopened
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == "cohortPatientId")
    );
}

#[test]
fn report_is_idempotent_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(
        dir.path(),
        &[("patient.csv", "sitePatientId,race\nP001,1\nP001,1\n")],
    );

    let first = run_check(&config).unwrap();
    let second = run_check(&config).unwrap();

    assert_eq!(first.submission, second.submission);
    assert_eq!(
        first.tables[0].summary, second.tables[0].summary
    );
}

#[test]
fn empty_upload_is_a_terminal_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), &[("patient.csv", "")]);

    let error = run_check(&config).unwrap_err();
    assert!(format!("{error:#}").contains("patient.csv"));
}
