use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use ifaces_core::{format, format_json, parse_file, FileStore, InterfaceRecord, InterfacesStore};
use ifaces_sync::inspect::render_records;
use log::{info, LevelFilter};

mod cli;
mod path_guard;
mod sync_cmd;

use cli::{CheckArgs, Cli, Command, FormatArgs, InspectArgs, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Check(args) => run_check(args),
        Command::Format(args) => run_format(args),
        Command::Plan(args) => sync_cmd::run_plan(args),
        Command::Apply(args) => sync_cmd::run_apply(args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter(None, LevelFilter::Warn);
    for target in ["ifaces_core", "ifaces_sync"] {
        builder.filter(Some(target), level);
    }
    builder.parse_env("IFACES_SYNC_LOG");
    builder.init();
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let records = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    match args.format {
        OutputFormat::Text => print!("{}", render_records(&records)),
        OutputFormat::Json => println!("{}", format_json(&records)?),
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let (text, records) = regenerate(&args.file)?;
    info!("{} regenerates to {} bytes", args.file.display(), text.len());
    println!("ok: {} ({} interfaces)", args.file.display(), records.len());
    Ok(())
}

fn run_format(args: FormatArgs) -> Result<()> {
    let (text, _) = regenerate(&args.file)?;

    match args.output {
        Some(output) => {
            path_guard::ensure_output_differs(&output, &args.file)?;
            FileStore::new(&output)
                .write(&text)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!("wrote normalized {} to {}", args.file.display(), output.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Parse `path` and render it back, surfacing both parse and validation errors.
fn regenerate(path: &Path) -> Result<(String, Vec<InterfaceRecord>)> {
    let records: Vec<InterfaceRecord> = parse_file(path)
        .with_context(|| format!("failed to parse {}", path.display()))?
        .into_values()
        .collect();
    let text = format(&records)
        .with_context(|| format!("failed to regenerate {}", path.display()))?;
    Ok((text, records))
}
