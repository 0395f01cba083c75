//! Library module for the anonsurveyor binary.
//!
//! Exposes the CLI definition, the session driver and the reporters so they
//! can be exercised from integration tests. The binary entry point is in
//! main.rs.

pub mod output;
pub mod report;
pub mod session;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI argument structure
#[derive(Parser)]
#[command(name = "anonsurveyor")]
#[command(about = "Re-identification risk and de-identification effectiveness tool")]
#[command(version)]
#[command(long_about = "
AnonSurveyor - Re-identification risk assessment for tabular data

STAGES:
- classify: score every column by how uniquely its values identify rows,
  then bucket columns into quasi-identifiers, sensitive attributes and
  non-sensitive columns using alpha/beta thresholds
- evaluate: measure k-anonymity, l-diversity, t-closeness, privacy gain and
  utility loss of progressively de-identified datasets and pick the number
  of QIDs worth de-identifying

SUPPORTED INPUTS:
- CSV (.csv), TSV (.tsv), JSON array of row objects (.json)

EXAMPLES:
  anonsurveyor classify patients.csv --exclude name,ssn
  anonsurveyor classify patients.csv --alpha 80 --beta 20 --format json
  anonsurveyor evaluate --original patients.csv --suppressed suppressed.csv \\
      --qids zip,age --sas disease \\
      --attempt zip=zip.csv --attempt zip,age=zip_age.csv
")]
pub struct Cli {
    /// Logging flags shared by every subcommand
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Stage to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Score and classify the columns of a dataset
    Classify(ClassifyArgs),
    /// Evaluate de-identification attempts and select the QID dimension
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Report rendering format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ReportFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Output file path
    #[arg(short, long, help = "Write the report to a file instead of stdout")]
    pub output: Option<PathBuf>,

    /// Enable compression
    #[arg(long, help = "Compress JSON output using Zstandard (.json.zst)")]
    pub compress: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Dataset to classify
    #[arg(help = "Dataset file (.csv, .tsv or .json)")]
    pub input: PathBuf,

    /// Direct identifiers removed before scoring
    #[arg(
        long,
        default_value = "",
        help = "Comma-separated direct identifiers to exclude (e.g. name,ssn)"
    )]
    pub exclude: String,

    /// Upper risk threshold
    #[arg(
        long,
        env = "ANONSURVEYOR_ALPHA",
        requires = "beta",
        help = "Risk rate above which a column is a sensitive attribute"
    )]
    pub alpha: Option<f64>,

    /// Lower risk threshold
    #[arg(
        long,
        env = "ANONSURVEYOR_BETA",
        requires = "alpha",
        help = "Risk rate from which a column is a quasi-identifier"
    )]
    pub beta: Option<f64>,

    /// Missing-value threshold
    #[arg(
        long,
        default_value_t = anonsurveyor_core::classification::DEFAULT_MISSING_THRESHOLD_PCT,
        help = "Drop columns with more than this percentage of missing values"
    )]
    pub missing_threshold: f64,

    /// Apply the missing-value threshold even when the dataset has no gaps
    #[arg(long, help = "Check every column against the missing-value threshold")]
    pub per_column_missing_gate: bool,

    /// Report format and destination
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Original dataset
    #[arg(long, help = "Original dataset file")]
    pub original: PathBuf,

    /// Fully suppressed dataset
    #[arg(long, help = "Dataset with every QID fully suppressed")]
    pub suppressed: PathBuf,

    /// Declared QIDs
    #[arg(long, help = "Comma-separated QIDs, highest risk first")]
    pub qids: String,

    /// Declared sensitive attributes
    #[arg(long, help = "Comma-separated sensitive attributes")]
    pub sas: String,

    /// De-identification attempts
    #[arg(
        long = "attempt",
        value_parser = parse_attempt_spec,
        help = "De-identified QIDs and dataset file, e.g. zip,age=after.csv (repeatable)"
    )]
    pub attempts: Vec<AttemptSpec>,

    /// Group by the other sensitive attributes as well when measuring t-closeness
    #[arg(long, help = "Measure t-closeness conditioned on the other sensitive attributes")]
    pub conditional_t: bool,

    /// Minimum acceptable k-anonymity
    #[arg(
        long,
        default_value_t = anonsurveyor_core::anonymity::DEFAULT_MIN_K_ANONYMITY,
        help = "Attempts below this k-anonymity are never selected"
    )]
    pub min_k: usize,

    /// Report format and destination
    #[command(flatten)]
    pub output: OutputArgs,
}

/// One `--attempt` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSpec {
    /// Cumulative de-identified QIDs
    pub qids: Vec<String>,
    /// De-identified dataset file
    pub path: PathBuf,
}

/// Splits a comma-separated column list.
///
/// Spaces and double quotes are removed and empty entries dropped, so
/// `"zip", "age"` and `zip,age` are the same list.
pub fn parse_column_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|name| name.replace([' ', '"'], ""))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Parses `qid,qid=path` into an [`AttemptSpec`].
pub fn parse_attempt_spec(raw: &str) -> Result<AttemptSpec, String> {
    let (qids, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QIDS=PATH, got '{raw}'"))?;

    let qids = parse_column_list(qids);
    if qids.is_empty() {
        return Err(format!("attempt '{raw}' does not name any QID"));
    }
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("attempt '{raw}' has no dataset path"));
    }

    Ok(AttemptSpec {
        qids,
        path: PathBuf::from(path),
    })
}
