//! Mock implementations of the engine's collaborator traits.
//!
//! These mocks provide controllable test doubles for the record store, the
//! completion source and the notifier, enabling deterministic unit tests.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::completion::{CompletionRecord, CompletionSource};
use crate::notify::Notifier;
use crate::store::RecordStore;

/// In-memory record store.
///
/// Reads and writes operate on a plain map. Individual records can be
/// configured to fail on read or write, and every access is logged.
///
/// # Example
///
/// ```rust,ignore
/// let store = MemoryRecordStore::new()
///     .with_record("Recurring", "- [ ] Water plants [recur: day_1]")
///     .with_failing_write("2025-06-02");
/// ```
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: HashMap<String, String>,
    failing_reads: Vec<String>,
    failing_writes: Vec<String>,
    reads: Mutex<Vec<String>>,
    writes: Vec<String>,
}

impl Clone for MemoryRecordStore {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            failing_reads: self.failing_reads.clone(),
            failing_writes: self.failing_writes.clone(),
            reads: Mutex::new(self.read_log()),
            writes: self.writes.clone(),
        }
    }
}

impl MemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record with content.
    #[must_use]
    pub fn with_record(mut self, name: &str, content: &str) -> Self {
        self.records.insert(name.to_string(), content.to_string());
        self
    }

    /// Make reads of the named record fail.
    #[must_use]
    pub fn with_failing_read(mut self, name: &str) -> Self {
        self.failing_reads.push(name.to_string());
        self
    }

    /// Make writes of the named record fail.
    #[must_use]
    pub fn with_failing_write(mut self, name: &str) -> Self {
        self.failing_writes.push(name.to_string());
        self
    }

    /// Current content of a record.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<String> {
        self.records.get(name).cloned()
    }

    /// Number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Names of successfully written records, in order.
    #[must_use]
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// Names passed to `read`, in order.
    #[must_use]
    pub fn read_log(&self) -> Vec<String> {
        self.reads
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, name: &str) -> Result<Option<String>> {
        if let Ok(mut log) = self.reads.lock() {
            log.push(name.to_string());
        }
        if self.failing_reads.iter().any(|n| n == name) {
            bail!("simulated read failure for '{}'", name);
        }
        Ok(self.records.get(name).cloned())
    }

    fn write(&mut self, name: &str, content: &str) -> Result<()> {
        if self.failing_writes.iter().any(|n| n == name) {
            bail!("simulated write failure for '{}'", name);
        }
        self.records.insert(name.to_string(), content.to_string());
        self.writes.push(name.to_string());
        Ok(())
    }
}

/// Completion source returning a fixed set of records.
///
/// # Example
///
/// ```rust,ignore
/// let source = StaticCompletionSource::new()
///     .with_completion("Mow lawn", completed_at);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCompletionSource {
    records: Vec<CompletionRecord>,
    error: Option<String>,
}

impl StaticCompletionSource {
    /// Create a source with no completions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a completion record.
    #[must_use]
    pub fn with_completion(mut self, display_name: &str, completed_at: DateTime<Utc>) -> Self {
        self.records.push(CompletionRecord {
            display_name: display_name.to_string(),
            completed_at,
        });
        self
    }

    /// Make the source fail with an error.
    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

impl CompletionSource for StaticCompletionSource {
    fn completed_items(&self) -> Result<Vec<CompletionRecord>> {
        if let Some(error) = &self.error {
            bail!("{}", error);
        }
        Ok(self.records.clone())
    }
}

/// Notifier that collects messages into a buffer.
#[derive(Debug, Default)]
pub struct BufferNotifier {
    messages: Mutex<Vec<String>>,
}

impl BufferNotifier {
    /// Create an empty buffer notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for BufferNotifier {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
