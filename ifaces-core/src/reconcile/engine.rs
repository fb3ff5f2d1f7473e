use std::collections::{BTreeSet, HashSet};

use log::debug;
use thiserror::Error;

use crate::parser::Interfaces;
use crate::reconcile::changeset::{ChangeEntry, Changeset, FieldChange};
use crate::record::{is_stanza_marker, InterfaceRecord, LifecycleState};

/// Errors raised before any desired record is matched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The desired set names the same interface twice.
    #[error("interface '{0}' is declared more than once in the desired state")]
    DuplicateDesired(String),
}

/// Reject desired sets that name an interface more than once.
pub fn check_desired(desired: &[InterfaceRecord]) -> Result<(), ReconcileError> {
    let mut seen = HashSet::new();
    for record in desired {
        if !seen.insert(record.name.as_str()) {
            return Err(ReconcileError::DuplicateDesired(record.name.clone()));
        }
    }
    Ok(())
}

/// Match desired records against discovered ones by name and classify each.
///
/// Discovered records without a desired counterpart are carried over
/// untouched.
pub fn reconcile(
    desired: &[InterfaceRecord],
    discovered: &Interfaces,
) -> Result<Changeset, ReconcileError> {
    check_desired(desired)?;

    let mut records = discovered.clone();
    let mut entries = Vec::with_capacity(desired.len());

    for want in desired {
        let want = want.clone().with_boot_marker_folded();
        let name = want.name.clone();
        match (want.state, discovered.get(&want.name)) {
            (LifecycleState::Absent, Some(found)) => {
                records.remove(&name);
                entries.push(ChangeEntry::Delete {
                    name,
                    record: found.clone(),
                });
            }
            (LifecycleState::Absent, None) => {
                debug!("{name} is absent and not on disk; nothing to do");
            }
            (LifecycleState::Present, None) => {
                records.insert(name.clone(), want.clone());
                entries.push(ChangeEntry::Create { name, record: want });
            }
            (LifecycleState::Present, Some(found)) => {
                let merged = overlay(found, &want);
                let changes = field_changes(found, &merged);
                if changes.is_empty() {
                    entries.push(ChangeEntry::Unchanged { name });
                } else {
                    records.insert(name.clone(), merged);
                    entries.push(ChangeEntry::Update { name, changes });
                }
            }
        }
    }

    Ok(Changeset { entries, records })
}

/// Overwrite `found` with every field `want` sets explicitly.
///
/// An `allow-auto` marker on either side is read as `onboot`.
pub fn overlay(found: &InterfaceRecord, want: &InterfaceRecord) -> InterfaceRecord {
    let found = found.clone().with_boot_marker_folded();
    let want = want.clone().with_boot_marker_folded();
    let mut options = found.options.clone();
    options.extend(want.options.clone());

    InterfaceRecord {
        name: found.name.clone(),
        family: want.family.or(found.family),
        method: want.method.clone().or_else(|| found.method.clone()),
        ipaddress: want.ipaddress.clone().or_else(|| found.ipaddress.clone()),
        netmask: want.netmask.clone().or_else(|| found.netmask.clone()),
        onboot: want.onboot.or(found.onboot),
        options,
        state: LifecycleState::Present,
    }
}

/// Differences that would change the rendered file.
///
/// Boot flags and stanza markers compare by truthiness, since `None` and
/// `Some(false)` (or `"true"` and `"yes"`) render identically.
pub fn field_changes(before: &InterfaceRecord, after: &InterfaceRecord) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    push_change(
        &mut changes,
        "family",
        before.family.map(|f| f.to_string()),
        after.family.map(|f| f.to_string()),
    );
    push_change(
        &mut changes,
        "method",
        before.method.as_ref().map(ToString::to_string),
        after.method.as_ref().map(ToString::to_string),
    );
    push_change(
        &mut changes,
        "ipaddress",
        before.ipaddress.clone(),
        after.ipaddress.clone(),
    );
    push_change(
        &mut changes,
        "netmask",
        before.netmask.clone(),
        after.netmask.clone(),
    );
    if before.is_onboot() != after.is_onboot() {
        changes.push(FieldChange {
            field: "onboot".to_string(),
            before: Some(before.is_onboot().to_string()),
            after: Some(after.is_onboot().to_string()),
        });
    }

    let keys: BTreeSet<&String> = before.options.keys().chain(after.options.keys()).collect();
    for key in keys {
        if is_stanza_marker(key) {
            if before.has_marker(key) != after.has_marker(key) {
                changes.push(FieldChange {
                    field: format!("options.{key}"),
                    before: Some(before.has_marker(key).to_string()),
                    after: Some(after.has_marker(key).to_string()),
                });
            }
            continue;
        }
        push_change(
            &mut changes,
            &format!("options.{key}"),
            before.options.get(key).cloned(),
            after.options.get(key).cloned(),
        );
    }

    changes
}

fn push_change(
    changes: &mut Vec<FieldChange>,
    field: &str,
    before: Option<String>,
    after: Option<String>,
) {
    if before != after {
        changes.push(FieldChange {
            field: field.to_string(),
            before,
            after,
        });
    }
}
