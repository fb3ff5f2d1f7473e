use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Default suffix appended to the target path for backups.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to back up {path}: {source}")]
    Backup {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Persistence collaborator for the interfaces file.
///
/// The reconciler calls `read` at most once per run, and `backup` followed
/// by `write` at most once, only when something changed.
pub trait InterfacesStore {
    /// Return the current file text.
    fn read(&mut self) -> Result<String, StoreError>;
    /// Snapshot the current file before it is overwritten.
    fn backup(&mut self) -> Result<(), StoreError>;
    /// Replace the file with `text`.
    fn write(&mut self, text: &str) -> Result<(), StoreError>;
}

/// Interfaces file on the local filesystem.
///
/// Writes go to a temporary file in the target directory that is renamed
/// over the target, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    backup_suffix: String,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }

    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path the backup copy is written to.
    pub fn backup_path(&self) -> PathBuf {
        let mut raw = self.path.clone().into_os_string();
        raw.push(&self.backup_suffix);
        PathBuf::from(raw)
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

impl InterfacesStore for FileStore {
    /// A missing file reads as empty text.
    fn read(&mut self) -> Result<String, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(source) if source.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet; treating as empty", self.display());
                Ok(String::new())
            }
            Err(source) => Err(StoreError::Read {
                path: self.display(),
                source,
            }),
        }
    }

    fn backup(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            warn!("{} does not exist; skipping backup", self.display());
            return Ok(());
        }
        let backup = self.backup_path();
        fs::copy(&self.path, &backup).map_err(|source| StoreError::Backup {
            path: backup.display().to_string(),
            source,
        })?;
        debug!("backed up {} to {}", self.display(), backup.display());
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let err = |source| StoreError::Write {
            path: self.display(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&dir).map_err(err)?;
        tmp.write_all(text.as_bytes()).map_err(err)?;
        tmp.as_file().sync_all().map_err(err)?;
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(err)?;
        }
        tmp.persist(&self.path).map_err(|e| err(e.error))?;
        Ok(())
    }
}

/// In-memory store that records every backup and write it receives.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Current file text.
    pub text: String,
    /// Number of `read` calls.
    pub reads: usize,
    /// Snapshots taken by `backup`, oldest first.
    pub backups: Vec<String>,
    /// Texts passed to `write`, oldest first.
    pub writes: Vec<String>,
}

impl MemoryStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl InterfacesStore for MemoryStore {
    fn read(&mut self) -> Result<String, StoreError> {
        self.reads += 1;
        Ok(self.text.clone())
    }

    fn backup(&mut self) -> Result<(), StoreError> {
        self.backups.push(self.text.clone());
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), StoreError> {
        self.writes.push(text.to_string());
        self.text = text.to_string();
        Ok(())
    }
}
