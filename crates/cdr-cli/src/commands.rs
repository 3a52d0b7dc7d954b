//! Subcommand entry points.

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{CheckArgs, NormalizeArgs};
use crate::pipeline::{CheckConfig, run_check, run_normalize};
use crate::types::CheckOutcome;

pub fn check(args: &CheckArgs) -> Result<CheckOutcome> {
    let config = CheckConfig {
        submission_dir: args.submission_dir.clone(),
        definitions_path: args.definitions.clone(),
        mappings_path: args.mappings.clone(),
        artifacts_dir: args.artifacts_dir.clone(),
    };
    let outcome = run_check(&config)?;

    if let Some(path) = &args.out {
        let writer = BufWriter::new(
            File::create(path).with_context(|| format!("create report {}", path.display()))?,
        );
        serde_json::to_writer_pretty(writer, &outcome)
            .with_context(|| format!("write report {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    }
    Ok(outcome)
}

pub fn normalize(args: &NormalizeArgs) -> Result<()> {
    let report = run_normalize(
        &args.input,
        &args.output,
        &args.definitions,
        args.mappings.as_deref(),
    )?;
    info!(
        rows = report.data_rows,
        renames = report.renamed.len(),
        mismatches = report.field_count_mismatches,
        output = %args.output.display(),
        "normalized upload"
    );
    Ok(())
}
