//! CLI argument definitions for the trial matcher.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ctm_report::ReportFormat;

#[derive(Parser)]
#[command(
    name = "trial-matcher",
    version,
    about = "Clinical trial matcher - find the trials each patient is eligible for",
    long_about = "Match patient records against clinical trial eligibility criteria.\n\n\
                  Reads a folder of patient bundles and a folder of trial documents,\n\
                  extracts age limits and inclusion/exclusion conditions from each trial,\n\
                  and writes the eligible trials per patient as JSON and/or CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

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

    /// Allow patient condition and allergy values in trace logs.
    ///
    /// These values are protected health information and are redacted by
    /// default.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match every patient against every trial and write the results.
    Match(MatchArgs),

    /// Show the structured criteria extracted from each trial.
    Criteria(CriteriaArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Folder of patient bundle JSON files.
    #[arg(value_name = "PATIENTS_DIR")]
    pub patients_dir: PathBuf,

    /// Folder of trial JSON files.
    #[arg(value_name = "TRIALS_DIR")]
    pub trials_dir: PathBuf,

    /// Output directory for result files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Result formats to write.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormatArg,

    /// Match and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Calendar year patient ages are computed against (default: current year).
    #[arg(long = "reference-year", value_name = "YEAR")]
    pub reference_year: Option<i32>,

    /// Worker threads for matching (default: one per core).
    #[arg(long = "threads", value_name = "N", conflicts_with = "sequential")]
    pub threads: Option<usize>,

    /// Evaluate patients one at a time on the calling thread.
    #[arg(long = "sequential")]
    pub sequential: bool,

    #[command(flatten)]
    pub recognizer: RecognizerArgs,
}

#[derive(Parser)]
pub struct CriteriaArgs {
    /// Folder of trial JSON files.
    #[arg(value_name = "TRIALS_DIR")]
    pub trials_dir: PathBuf,

    #[command(flatten)]
    pub recognizer: RecognizerArgs,
}

/// Entity recognizer settings shared by commands that read criteria.
#[derive(Args)]
pub struct RecognizerArgs {
    /// Lexicon CSV (`term,label`) replacing the built-in disease lexicon.
    #[arg(long = "lexicon", value_name = "PATH")]
    pub lexicon: Option<PathBuf>,

    /// Entity label treated as a condition mention (repeatable).
    #[arg(long = "disease-label", value_name = "LABEL")]
    pub disease_labels: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Csv,
    Both,
}

impl From<OutputFormatArg> for ReportFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Json => ReportFormat::Json,
            OutputFormatArg::Csv => ReportFormat::Csv,
            OutputFormatArg::Both => ReportFormat::Both,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
