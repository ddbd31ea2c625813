//! Completion records and the index built from them.
//!
//! Completion-relative rules need to know when an item was last finished.
//! A [`CompletionSource`] supplies raw completion records; the engine folds
//! them into a [`CompletionIndex`] keeping only the most recent timestamp
//! per display name.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::rule::LineParser;

/// A single observed completion of an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    /// Item text with marker and directives stripped
    pub display_name: String,
    /// When the completion was observed
    pub completed_at: DateTime<Utc>,
}

/// Supplier of completion records.
pub trait CompletionSource {
    /// Collect every known completion.
    fn completed_items(&self) -> Result<Vec<CompletionRecord>>;
}

/// Most recent completion per display name.
#[derive(Debug, Clone, Default)]
pub struct CompletionIndex {
    latest: HashMap<String, DateTime<Utc>>,
}

impl CompletionIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold records into an index, keeping the latest timestamp per name.
    #[must_use]
    pub fn from_records(records: Vec<CompletionRecord>) -> Self {
        let mut latest: HashMap<String, DateTime<Utc>> = HashMap::new();
        for CompletionRecord {
            display_name,
            completed_at,
        } in records
        {
            latest
                .entry(display_name)
                .and_modify(|at| {
                    if completed_at > *at {
                        *at = completed_at;
                    }
                })
                .or_insert(completed_at);
        }
        Self { latest }
    }

    /// Most recent completion timestamp for a display name.
    #[must_use]
    pub fn latest(&self, display_name: &str) -> Option<DateTime<Utc>> {
        self.latest.get(display_name).copied()
    }

    /// Number of distinct names in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    /// Check whether the index holds no completions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

/// Completion source that scans the vault's markdown files.
///
/// Every line marked `[x]` counts as a completion of its display text,
/// timestamped with the containing file's modification time. Hidden
/// directories are skipped.
#[derive(Debug, Clone)]
pub struct FsCompletionSource {
    vault: PathBuf,
    parser: LineParser,
    done_marker: Regex,
}

impl FsCompletionSource {
    /// Create a source scanning the given vault root.
    pub fn new(vault: impl Into<PathBuf>) -> Result<Self> {
        use anyhow::Context;
        Ok(Self {
            vault: vault.into(),
            parser: LineParser::new()?,
            done_marker: Regex::new(r"^\s*[-*]\s+\[[xX]\]\s+")
                .context("Failed to compile completion marker regex")?,
        })
    }
}

impl CompletionSource for FsCompletionSource {
    fn completed_items(&self) -> Result<Vec<CompletionRecord>> {
        let mut records = Vec::new();

        for entry in WalkDir::new(&self.vault)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().map(|e| e == "md").unwrap_or(false))
        {
            let Some(completed_at) = modified_time(&entry) else {
                continue;
            };
            let Ok(content) = std::fs::read_to_string(entry.path()) else {
                debug!("Skipping unreadable file {}", entry.path().display());
                continue;
            };

            for line in content.lines() {
                if !self.done_marker.is_match(line) {
                    continue;
                }
                let display_name = self.parser.display_text(line);
                if !display_name.is_empty() {
                    records.push(CompletionRecord {
                        display_name,
                        completed_at,
                    });
                }
            }
        }

        Ok(records)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn modified_time(entry: &DirEntry) -> Option<DateTime<Utc>> {
    let modified = entry.metadata().ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}
