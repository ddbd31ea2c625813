//! Test fixtures for creating reproducible vault environments.
//!
//! Provides temporary on-disk vaults for tests that exercise the
//! filesystem-backed store and completion source.

use std::path::Path;
use tempfile::TempDir;

/// A test fixture representing a temporary vault directory.
///
/// Automatically cleans up when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let vault = VaultFixture::with_source("- [ ] Water plants [recur: day_1]\n");
/// assert!(vault.read_page("Recurring").is_some());
/// // Directory is cleaned up when the fixture goes out of scope
/// ```
pub struct VaultFixture {
    temp_dir: TempDir,
}

impl VaultFixture {
    /// Create an empty vault.
    ///
    /// # Panics
    ///
    /// Panics if temporary directory creation fails.
    #[must_use]
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Create a vault whose `Recurring` page holds the given content.
    ///
    /// # Panics
    ///
    /// Panics if file creation fails.
    #[must_use]
    pub fn with_source(content: &str) -> Self {
        let vault = Self::empty();
        vault.write_page("Recurring", content);
        vault
    }

    /// Write a page by name.
    ///
    /// # Panics
    ///
    /// Panics if the write fails.
    pub fn write_page(&self, name: &str, content: &str) {
        let path = self.temp_dir.path().join(format!("{}.md", name));
        std::fs::write(path, content).expect("Failed to write page");
    }

    /// Read a page by name, `None` when it does not exist.
    #[must_use]
    pub fn read_page(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.temp_dir.path().join(format!("{}.md", name))).ok()
    }

    /// Root directory of the vault.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
