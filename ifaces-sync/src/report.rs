use colored::Colorize;
use ifaces_core::{format_summary, format_text, ChangeEntry};

/// Render changeset entries for terminal output.
pub fn render_text(entries: &[ChangeEntry]) -> String {
    let raw = format_text(entries);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with('~') {
            line.yellow().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render summary counts for terminal output.
pub fn render_summary(entries: &[ChangeEntry]) -> String {
    format_summary(entries).cyan().to_string()
}

/// Render the outcome line of an apply run.
pub fn render_outcome(target: &str, written: bool, dry_run: bool) -> String {
    match (written, dry_run) {
        (_, true) => format!("dry run: {target} left untouched"),
        (true, false) => format!("wrote {target}").as_str().green().to_string(),
        (false, false) => format!("{target} already up to date"),
    }
}
