use crate::reconcile::changeset::ChangeEntry;

/// Format changeset entries as plain text.
pub fn format_text(entries: &[ChangeEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            ChangeEntry::Create { name, .. } => lines.push(format!("+ {name}")),
            ChangeEntry::Delete { name, .. } => lines.push(format!("- {name}")),
            ChangeEntry::Unchanged { name } => lines.push(format!("= {name}")),
            ChangeEntry::Update { name, changes } => {
                lines.push(format!("~ {name}"));
                for change in changes {
                    lines.push(format!(
                        "    {}: {} -> {}",
                        change.field,
                        show(change.before.as_deref()),
                        show(change.after.as_deref())
                    ));
                }
            }
        }
    }
    lines.join("\n")
}

/// Format a one-line summary of changeset counts.
pub fn format_summary(entries: &[ChangeEntry]) -> String {
    let mut create = 0;
    let mut update = 0;
    let mut delete = 0;
    let mut unchanged = 0;

    for entry in entries {
        match entry {
            ChangeEntry::Create { .. } => create += 1,
            ChangeEntry::Update { .. } => update += 1,
            ChangeEntry::Delete { .. } => delete += 1,
            ChangeEntry::Unchanged { .. } => unchanged += 1,
        }
    }

    format!("create={create} update={update} delete={delete} unchanged={unchanged}")
}

fn show(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{value:?}"),
        None => "(unset)".to_string(),
    }
}
