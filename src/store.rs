//! Record storage.
//!
//! Pages and daily records are addressed by bare name; the store maps
//! names to markdown files. [`FsRecordStore`] is the production store,
//! rooted at the vault directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Name of the daily record for a given day.
///
/// The configured prefix allows records to live in a subdirectory, e.g.
/// a prefix of `journal/` yields `journal/2025-06-02`.
#[must_use]
pub fn record_name(prefix: &str, day: NaiveDate) -> String {
    format!("{}{}", prefix, day.format("%Y-%m-%d"))
}

/// Read and write access to named records.
pub trait RecordStore {
    /// Read a record's content, `None` when it does not exist.
    fn read(&self, name: &str) -> Result<Option<String>>;

    /// Write a record's content, creating it if needed.
    fn write(&mut self, name: &str, content: &str) -> Result<()>;
}

/// Store backed by markdown files under a vault directory.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    vault: PathBuf,
}

impl FsRecordStore {
    /// Create a store rooted at the given vault directory.
    pub fn new(vault: impl Into<PathBuf>) -> Self {
        Self {
            vault: vault.into(),
        }
    }

    /// File path backing a record name.
    #[must_use]
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.vault.join(format!("{}.md", name))
    }
}

impl RecordStore for FsRecordStore {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.record_path(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read record {}", path.display()))
            }
        }
    }

    fn write(&mut self, name: &str, content: &str) -> Result<()> {
        let path = self.record_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write record {}", path.display()))
    }
}
