//! CLI argument definitions for the `cmap` reconciler.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cmap",
    version,
    about = "Reconcile coded medical records with a UMLS-derived terminology reference",
    long_about = "Reconcile reviewer-curated (coding system, code, term, concept) records with a\n\
                  terminology reference table.\n\n\
                  Each record is classified by the first matching strategy of a fixed cascade\n\
                  and, when matched, corrected to the accepted reference row."
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

    /// Allow codes and terms in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML run configuration.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate every CSV table of a directory and write annotated copies.
    Dedup(DedupArgs),

    /// Validate a single record.
    Check(CheckArgs),

    /// Show reference table statistics and recognized coding systems.
    Info(ReferenceArgs),
}

/// Reference inputs shared by all commands.
#[derive(Args, Clone, Default)]
pub struct ReferenceArgs {
    /// Merged reference table (CSV with cui, sab, code, str, ttys).
    #[arg(long = "reference", value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Retired concept table (pipe-delimited MRCUI.RRF).
    #[arg(long = "retired", value_name = "PATH")]
    pub retired: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DedupArgs {
    /// Directory with the reviewer CSV tables.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory for the annotated tables (created if missing).
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub reference: ReferenceArgs,

    /// Worker threads used per table.
    #[arg(long = "jobs", short = 'j', default_value_t = 1)]
    pub jobs: usize,

    /// Process at most this many tables.
    #[arg(long = "max", value_name = "N")]
    pub max: Option<usize>,
}

#[derive(Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub reference: ReferenceArgs,

    /// Coding system (aliases such as `e` are resolved).
    #[arg(long = "sab")]
    pub coding_system: Option<String>,

    /// Code as written by the reviewer.
    #[arg(long = "code")]
    pub code: Option<String>,

    /// Term as written by the reviewer.
    #[arg(long = "term", default_value = "")]
    pub term: String,

    /// UMLS concept identifier.
    #[arg(long = "cui")]
    pub concept: Option<String>,

    /// Print the result as JSON.
    #[arg(long = "json")]
    pub json: bool,
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
