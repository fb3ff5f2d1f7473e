//! Desired-state driven management of Debian `/etc/network/interfaces`.
//!
//! The parsing, formatting and reconciliation engine lives in `ifaces-core`;
//! this crate adds what a command line tool needs on top of it:
//!
//! - [`desired`] — load the desired interface set from a TOML file
//! - [`inspect`] — render discovered records for humans
//! - [`report`] — terminal-friendly colored changeset output
//!
//! # Workflow
//!
//! 1. **Load** the desired state (`[[interface]]` tables, optional `[settings]`)
//! 2. **Read** and parse the current interfaces file
//! 3. **Reconcile** desired records against discovered ones by name
//! 4. **Write** the regenerated file, with a backup, only if something changed
//!
//! ```ignore
//! use ifaces_core::{sync, FileStore};
//! use ifaces_sync::desired::load_desired;
//!
//! let desired = load_desired("desired.toml".as_ref())?;
//! let mut store = FileStore::new("/etc/network/interfaces");
//! let outcome = sync(&desired.interfaces, &mut store)?;
//! println!("written={}", outcome.written);
//! ```

pub mod desired;
pub mod inspect;
pub mod report;
