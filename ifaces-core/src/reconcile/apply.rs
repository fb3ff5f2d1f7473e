use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::parser::{parse, ParseError};
use crate::reconcile::changeset::Changeset;
use crate::reconcile::engine::{check_desired, reconcile, ReconcileError};
use crate::record::InterfaceRecord;
use crate::store::{InterfacesStore, StoreError};
use crate::writer::{format, FormatError};

/// Errors that abort a reconcile run. Nothing is written once one is raised.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a full read/reconcile/write cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    pub changeset: Changeset,
    /// Whether the store was backed up and rewritten.
    pub written: bool,
}

/// Persist a changeset: render, back up, then write.
///
/// An empty changeset touches nothing, which avoids timestamp churn and
/// needless backups. Rendering happens before the backup so a record that
/// fails validation leaves the store untouched.
pub fn apply<S>(changeset: &Changeset, store: &mut S) -> Result<bool, ApplyError>
where
    S: InterfacesStore + ?Sized,
{
    if changeset.is_empty() {
        info!("interfaces already match the desired state; not writing");
        return Ok(false);
    }

    let text = format(&changeset.records())?;
    store.backup()?;
    store.write(&text)?;

    let (create, update, delete, _) = changeset.counts();
    info!("rewrote interfaces: create={create} update={update} delete={delete}");
    Ok(true)
}

/// Read and parse the store, then reconcile `desired` against it without
/// writing anything. The regenerated file is rendered once so records that
/// would fail validation are reported here too.
pub fn plan<S>(desired: &[InterfaceRecord], store: &mut S) -> Result<Changeset, ApplyError>
where
    S: InterfacesStore + ?Sized,
{
    check_desired(desired)?;
    let text = store.read()?;
    let discovered = parse(&text)?;
    let changeset = reconcile(desired, &discovered)?;
    if !changeset.is_empty() {
        format(&changeset.records())?;
    }
    Ok(changeset)
}

/// Read, parse, reconcile and apply in one pass.
pub fn sync<S>(desired: &[InterfaceRecord], store: &mut S) -> Result<ApplyOutcome, ApplyError>
where
    S: InterfacesStore + ?Sized,
{
    check_desired(desired)?;
    let text = store.read()?;
    let discovered = parse(&text)?;
    let changeset = reconcile(desired, &discovered)?;
    let written = apply(&changeset, store)?;
    Ok(ApplyOutcome { changeset, written })
}
