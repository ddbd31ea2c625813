//! Testing infrastructure for Rollo.
//!
//! This module provides mocks and fixtures for testing the engine and its
//! components without touching a real vault.
//!
//! # Architecture
//!
//! The testing infrastructure is organized into:
//! - **Mocks**: In-memory implementations of the engine's collaborator
//!   traits with controllable failures
//! - **Fixtures**: Temporary on-disk vaults for filesystem-backed tests
//!   (test-only)
//!
//! # Example
//!
//! ```rust,ignore
//! use rollo::testing::{BufferNotifier, MemoryRecordStore, StaticCompletionSource};
//!
//! let store = MemoryRecordStore::new()
//!     .with_record("Recurring", "- [ ] Water plants [recur: day_1]")
//!     .with_failing_write("2025-06-02");
//!
//! let completions = StaticCompletionSource::new();
//! let notifier = BufferNotifier::new();
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
#[cfg(test)]
pub use fixtures::*;
pub use mocks::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionSource;
    use crate::notify::Notifier;
    use crate::store::RecordStore;
    use chrono::{TimeZone, Utc};

    // =========================================================================
    // Memory Record Store Tests
    // =========================================================================

    #[test]
    fn test_memory_store_default_is_empty() {
        let store = MemoryRecordStore::default();
        assert_eq!(store.read("anything").unwrap(), None);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_memory_store_with_record() {
        let store = MemoryRecordStore::new().with_record("Recurring", "- [ ] Item");
        assert_eq!(
            store.read("Recurring").unwrap(),
            Some("- [ ] Item".to_string())
        );
    }

    #[test]
    fn test_memory_store_write_is_logged() {
        let mut store = MemoryRecordStore::new();
        store.write("2025-06-02", "content").unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.record("2025-06-02"), Some("content".to_string()));
    }

    #[test]
    fn test_memory_store_failing_read() {
        let store = MemoryRecordStore::new()
            .with_record("page", "content")
            .with_failing_read("page");
        assert!(store.read("page").is_err());
    }

    #[test]
    fn test_memory_store_failing_write_leaves_record_untouched() {
        let mut store = MemoryRecordStore::new()
            .with_record("page", "old")
            .with_failing_write("page");
        assert!(store.write("page", "new").is_err());
        assert_eq!(store.record("page"), Some("old".to_string()));
    }

    #[test]
    fn test_memory_store_reads_are_logged() {
        let store = MemoryRecordStore::new().with_record("page", "content");
        store.read("page").unwrap();
        store.read("missing").unwrap();
        assert_eq!(store.read_log(), vec!["page", "missing"]);
    }

    // =========================================================================
    // Static Completion Source Tests
    // =========================================================================

    #[test]
    fn test_static_source_default_is_empty() {
        let source = StaticCompletionSource::default();
        assert!(source.completed_items().unwrap().is_empty());
    }

    #[test]
    fn test_static_source_with_completion() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().unwrap();
        let source = StaticCompletionSource::new().with_completion("Mow lawn", at);
        let records = source.completed_items().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "Mow lawn");
        assert_eq!(records[0].completed_at, at);
    }

    #[test]
    fn test_static_source_with_error() {
        let source = StaticCompletionSource::new().with_error("scan exploded");
        let err = source.completed_items().unwrap_err();
        assert!(err.to_string().contains("scan exploded"));
    }

    // =========================================================================
    // Buffer Notifier Tests
    // =========================================================================

    #[test]
    fn test_buffer_notifier_captures_messages() {
        let notifier = BufferNotifier::new();
        notifier.notify("first");
        notifier.notify("second");
        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_buffer_notifier_starts_empty() {
        assert!(BufferNotifier::new().messages().is_empty());
    }

    // =========================================================================
    // Vault Fixture Tests (only available in test builds)
    // =========================================================================

    #[test]
    fn test_vault_fixture_empty() {
        let vault = VaultFixture::empty();
        assert!(vault.path().exists());
        assert_eq!(vault.read_page("Recurring"), None);
    }

    #[test]
    fn test_vault_fixture_with_source() {
        let vault = VaultFixture::with_source("- [ ] Water plants [recur: day_1]\n");
        assert_eq!(
            vault.read_page("Recurring"),
            Some("- [ ] Water plants [recur: day_1]\n".to_string())
        );
    }

    #[test]
    fn test_vault_fixture_write_and_read_page() {
        let vault = VaultFixture::empty();
        vault.write_page("2025-06-02", "## Tasks\n");
        assert_eq!(vault.read_page("2025-06-02"), Some("## Tasks\n".to_string()));
    }
}
