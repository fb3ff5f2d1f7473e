use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Interfaces file managed when neither `--file` nor `[settings] target` is given.
pub const DEFAULT_TARGET: &str = "/etc/network/interfaces";

#[derive(Parser, Debug)]
#[command(name = "ifaces-sync", version)]
#[command(about = "Reconcile Debian network interfaces files against a desired state")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Disable logging entirely.
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Show the interfaces described by a file.
    Inspect(InspectArgs),
    /// Check that a file parses and can be regenerated.
    Check(CheckArgs),
    /// Print the normalized form of a file.
    Format(FormatArgs),
    /// Show what `apply` would change without writing anything.
    Plan(PlanArgs),
    /// Reconcile a file against a desired state and write it if needed.
    Apply(ApplyArgs),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Interfaces file to read.
    #[arg(default_value = DEFAULT_TARGET)]
    pub file: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Interfaces file to check.
    #[arg(default_value = DEFAULT_TARGET)]
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Interfaces file to normalize.
    pub file: PathBuf,
    /// Write the result here instead of stdout. Must differ from the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Desired-state TOML file.
    #[arg(short, long)]
    pub desired: PathBuf,
    /// Interfaces file to reconcile (overrides `[settings] target`).
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Desired-state TOML file.
    #[arg(short, long)]
    pub desired: PathBuf,
    /// Interfaces file to reconcile (overrides `[settings] target`).
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Backup suffix (overrides `[settings] backup_suffix`).
    #[arg(long)]
    pub backup_suffix: Option<String>,
    /// Compute and print the changeset, but do not back up or write.
    #[arg(long)]
    pub dry_run: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
