use serde::Serialize;

use crate::parser::Interfaces;
use crate::record::InterfaceRecord;

/// One field that differs between a discovered record and its update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Field name, or `options.<key>` for option entries.
    pub field: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Reconciliation outcome for a single interface name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ChangeEntry {
    /// Desired record has no discovered counterpart.
    Create { name: String, record: InterfaceRecord },
    /// Discovered record is overwritten by the desired fields.
    Update {
        name: String,
        changes: Vec<FieldChange>,
    },
    /// Discovered record is dropped from the regenerated file.
    Delete { name: String, record: InterfaceRecord },
    /// Desired record already matches what is on disk.
    Unchanged { name: String },
}

impl ChangeEntry {
    pub fn name(&self) -> &str {
        match self {
            ChangeEntry::Create { name, .. }
            | ChangeEntry::Update { name, .. }
            | ChangeEntry::Delete { name, .. }
            | ChangeEntry::Unchanged { name } => name,
        }
    }

    /// Whether this entry requires the file to be rewritten.
    pub fn is_change(&self) -> bool {
        !matches!(self, ChangeEntry::Unchanged { .. })
    }
}

/// Create/update/delete decisions plus the record set they produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Changeset {
    pub entries: Vec<ChangeEntry>,
    /// Records that make up the regenerated file.
    #[serde(skip)]
    pub records: Interfaces,
}

impl Changeset {
    /// `true` when nothing needs to be written.
    pub fn is_empty(&self) -> bool {
        !self.entries.iter().any(ChangeEntry::is_change)
    }

    /// Records to hand to the writer, ordered by name.
    pub fn records(&self) -> Vec<InterfaceRecord> {
        self.records.values().cloned().collect()
    }

    /// Count entries per kind: `(create, update, delete, unchanged)`.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for entry in &self.entries {
            match entry {
                ChangeEntry::Create { .. } => counts.0 += 1,
                ChangeEntry::Update { .. } => counts.1 += 1,
                ChangeEntry::Delete { .. } => counts.2 += 1,
                ChangeEntry::Unchanged { .. } => counts.3 += 1,
            }
        }
        counts
    }
}
