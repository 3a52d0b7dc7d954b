//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cdr",
    version,
    about = "Clinical data repository ingestion and validation",
    long_about = "Ingest tabular research-site uploads into the repository's canonical \
                  schema and produce a validated dataset plus a structured data-quality \
                  audit.\n\n\
                  Column definitions and mapping documents are supplied as JSON; uploads \
                  are delimited text (.csv or .tsv)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row-level (PHI) values in log output.
    ///
    /// Off by default: identifier values and cell contents are replaced
    /// with a redaction token in every log statement.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a submission directory and emit the data-quality report.
    Check(CheckArgs),

    /// Normalize a single upload's header to the canonical schema.
    Normalize(NormalizeArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Directory holding the submission's .csv/.tsv uploads.
    #[arg(value_name = "SUBMISSION_DIR")]
    pub submission_dir: PathBuf,

    /// Column definition document (JSON, keyed by table name).
    #[arg(long = "definitions", value_name = "PATH")]
    pub definitions: PathBuf,

    /// Mapping document (JSON, keyed by table name; "default" applies
    /// when a table has no specific entry).
    #[arg(long = "mappings", value_name = "PATH")]
    pub mappings: Option<PathBuf>,

    /// Write the full report as JSON to this path.
    #[arg(long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Persist each table's materialized columnar dataset under this
    /// directory for later re-validation runs.
    #[arg(long = "artifacts-dir", value_name = "DIR")]
    pub artifacts_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Raw upload to normalize.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the normalized file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: PathBuf,

    /// Column definition document (JSON, keyed by table name).
    #[arg(long = "definitions", value_name = "PATH")]
    pub definitions: PathBuf,

    /// Mapping document (JSON, keyed by table name).
    #[arg(long = "mappings", value_name = "PATH")]
    pub mappings: Option<PathBuf>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
