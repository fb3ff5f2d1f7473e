use std::path::PathBuf;

use anyhow::{Context, Result};
use ifaces_core::{format_json, plan, sync, ApplyOutcome, Changeset, FileStore};
use ifaces_sync::desired::{load_desired, DesiredState};
use ifaces_sync::report::{render_outcome, render_summary, render_text};
use log::info;

use crate::cli::{ApplyArgs, OutputFormat, PlanArgs, DEFAULT_TARGET};

pub fn run_plan(args: PlanArgs) -> Result<()> {
    let desired = load(&args.desired)?;
    let target = resolve_target(args.file, &desired);
    let mut store = FileStore::new(&target);

    let changeset = plan(&desired.interfaces, &mut store)
        .with_context(|| format!("failed to plan changes for {}", target.display()))?;

    match args.format {
        OutputFormat::Text => print_changeset(&changeset),
        OutputFormat::Json => println!("{}", format_json(&changeset)?),
    }
    Ok(())
}

pub fn run_apply(args: ApplyArgs) -> Result<()> {
    let desired = load(&args.desired)?;
    let target = resolve_target(args.file, &desired);
    let suffix = args
        .backup_suffix
        .or_else(|| desired.settings.backup_suffix.clone());

    let mut store = FileStore::new(&target);
    if let Some(suffix) = suffix {
        store = store.with_backup_suffix(suffix);
    }
    info!(
        "reconciling {} interfaces against {}",
        desired.interfaces.len(),
        target.display()
    );

    let outcome = if args.dry_run {
        let changeset = plan(&desired.interfaces, &mut store)
            .with_context(|| format!("failed to plan changes for {}", target.display()))?;
        ApplyOutcome {
            changeset,
            written: false,
        }
    } else {
        sync(&desired.interfaces, &mut store)
            .with_context(|| format!("failed to apply changes to {}", target.display()))?
    };

    match args.format {
        OutputFormat::Text => {
            print_changeset(&outcome.changeset);
            println!(
                "{}",
                render_outcome(
                    &target.display().to_string(),
                    outcome.written,
                    args.dry_run
                )
            );
        }
        OutputFormat::Json => println!("{}", format_json(&outcome)?),
    }
    Ok(())
}

fn load(path: &std::path::Path) -> Result<DesiredState> {
    load_desired(path).with_context(|| format!("failed to load {}", path.display()))
}

/// `--file` beats `[settings] target`, which beats the system default.
fn resolve_target(flag: Option<PathBuf>, desired: &DesiredState) -> PathBuf {
    flag.or_else(|| desired.settings.target.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET))
}

fn print_changeset(changeset: &Changeset) {
    if !changeset.entries.is_empty() {
        println!("{}", render_text(&changeset.entries));
    }
    println!("{}", render_summary(&changeset.entries));
}
