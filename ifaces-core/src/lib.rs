//! Parsing, regeneration and reconciliation of Debian-style
//! `/etc/network/interfaces` files.

pub mod format;
pub mod parser;
pub mod reconcile;
pub mod record;
pub mod store;
pub mod writer;

pub use format::{format_json, format_summary, format_text};
pub use parser::{parse, parse_file, Interfaces, ParseError};
pub use reconcile::{
    apply, plan, reconcile, sync, ApplyError, ApplyOutcome, ChangeEntry, Changeset, FieldChange,
    ReconcileError,
};
pub use record::{Family, InterfaceRecord, LifecycleState, Method};
pub use store::{FileStore, InterfacesStore, MemoryStore, StoreError};
pub use writer::{format, format_at, FormatError, HEADER_PREFIX};
