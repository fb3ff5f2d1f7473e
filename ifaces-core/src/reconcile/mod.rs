//! Desired-versus-discovered reconciliation.

pub mod apply;
pub mod changeset;
pub mod engine;

pub use apply::{apply, plan, sync, ApplyError, ApplyOutcome};
pub use changeset::{ChangeEntry, Changeset, FieldChange};
pub use engine::{check_desired, reconcile, ReconcileError};
