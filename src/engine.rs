//! Run orchestration.
//!
//! A run walks four phases over the vault: load the source page and parse
//! its recurrence rules, evaluate which rules are due today, vacuum
//! unfinished items out of recent records, and merge everything into
//! today's record. Record reads are memoized for the duration of the run
//! so each record is read at most once.

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::completion::{CompletionIndex, CompletionSource};
use crate::config::EngineConfig;
use crate::due::{self, RecordProbe};
use crate::error::{Result, RolloError};
use crate::merge;
use crate::notify::Notifier;
use crate::rule::{LineParser, RecurrenceRule};
use crate::store::{record_name, RecordStore};
use crate::vacuum;

/// Where a queued line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrigin {
    /// Produced by a due recurrence rule
    Generated,
    /// Reclaimed from a past record by the vacuum
    RolledOver,
}

/// A line queued for insertion into today's record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToAddItem {
    pub line: String,
    pub origin: ItemOrigin,
}

/// Counters describing one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Day the run evaluated
    pub date: NaiveDate,
    /// Recurrence rules found on the source page
    pub rules_parsed: u32,
    /// Rules that were due
    pub due: u32,
    /// Unfinished items reclaimed from past records
    pub reclaimed: u32,
    /// Rule items newly added to today's record
    pub added: u32,
    /// Reclaimed items newly added to today's record
    pub rolled_over: u32,
    /// Candidates dropped because today's record already had them
    pub suppressed: u32,
    /// Past records rewritten by the vacuum
    pub rewritten_records: u32,
    /// Record writes that failed
    pub failed_writes: u32,
    /// Whether the run skipped all writes
    pub dry_run: bool,
}

impl RunSummary {
    #[must_use]
    pub fn new(date: NaiveDate, dry_run: bool) -> Self {
        Self {
            date,
            rules_parsed: 0,
            due: 0,
            reclaimed: 0,
            added: 0,
            rolled_over: 0,
            suppressed: 0,
            rewritten_records: 0,
            failed_writes: 0,
            dry_run,
        }
    }

    /// Check whether nothing was due and nothing was reclaimed.
    #[must_use]
    pub fn nothing_due(&self) -> bool {
        self.due == 0 && self.reclaimed == 0
    }

    /// Check whether candidates existed but all were already present.
    #[must_use]
    pub fn up_to_date(&self) -> bool {
        !self.nothing_due() && self.added == 0 && self.rolled_over == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nothing_due() {
            write!(f, "Nothing due on {}.", self.date)?;
        } else if self.up_to_date() {
            write!(
                f,
                "Already up to date: {} item(s) already present.",
                self.suppressed
            )?;
        } else {
            write!(
                f,
                "Added {} recurring item(s), rolled over {}.",
                self.added, self.rolled_over
            )?;
        }
        if self.failed_writes > 0 {
            write!(f, " {} write(s) failed.", self.failed_writes)?;
        }
        Ok(())
    }
}

/// Verdict for a single line, as produced by [`Engine::check_line`]
#[derive(Debug, Clone, Serialize)]
pub struct LineReport {
    pub date: NaiveDate,
    pub due: bool,
    pub rule: RecurrenceRule,
}

/// Per-run record cache.
///
/// Stores each record's content keyed by name, with `None` for records
/// that do not exist or could not be read. Writes update the cache so
/// later phases observe what was persisted.
#[derive(Debug, Default)]
struct RecordCache {
    entries: HashMap<String, Option<String>>,
}

impl RecordCache {
    fn read<S: RecordStore>(&mut self, store: &S, name: &str) -> Option<String> {
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| match store.read(name) {
                Ok(content) => content,
                Err(e) => {
                    warn!("{}", RolloError::record_io(name, e.to_string()));
                    None
                }
            })
            .clone()
    }

    fn update(&mut self, name: &str, content: &str) {
        self.entries
            .insert(name.to_string(), Some(content.to_string()));
    }
}

/// Record-existence probe backed by the run's cache.
struct HistoryProbe<'a, S> {
    store: &'a S,
    cache: &'a mut RecordCache,
    prefix: &'a str,
}

impl<S: RecordStore> RecordProbe for HistoryProbe<'_, S> {
    fn record_exists(&mut self, day: NaiveDate) -> bool {
        let name = record_name(self.prefix, day);
        self.cache.read(self.store, &name).is_some()
    }
}

/// The recurrence and rollover engine.
pub struct Engine<S, C, N> {
    config: EngineConfig,
    store: S,
    completions: C,
    notifier: N,
    parser: LineParser,
    cache: RecordCache,
}

impl<S: RecordStore, C: CompletionSource, N: Notifier> Engine<S, C, N> {
    /// Create an engine over the given collaborators.
    ///
    /// Validates the configuration and compiles the directive parser.
    pub fn new(config: EngineConfig, store: S, completions: C, notifier: N) -> Result<Self> {
        config.validate()?;
        let parser = LineParser::new()?;
        Ok(Self {
            config,
            store,
            completions,
            notifier,
            parser,
            cache: RecordCache::default(),
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The notifier the engine announces runs through.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Execute a full run for `today`.
    ///
    /// With `dry_run` set, every counter is computed as usual but no
    /// record is written.
    pub fn run(&mut self, today: NaiveDate, dry_run: bool) -> Result<RunSummary> {
        info!("Evaluating recurring items for {}", today);
        let mut summary = RunSummary::new(today, dry_run);

        let source = self.load_source()?;
        let index = self.load_index();

        let mut queue: Vec<ToAddItem> = Vec::new();
        self.collect_due(&source, today, &index, &mut queue, &mut summary);
        self.reclaim_history(today, dry_run, &mut queue, &mut summary)?;
        self.write_today(today, dry_run, &queue, &mut summary)?;

        info!(
            "Run complete: {} added, {} rolled over, {} suppressed",
            summary.added, summary.rolled_over, summary.suppressed
        );
        self.notifier.notify(&summary.to_string());
        Ok(summary)
    }

    /// Evaluate a single line as if it appeared on the source page.
    ///
    /// Returns `None` when the line carries no recurrence rule. The due
    /// verdict consults the real completion index and record history.
    pub fn check_line(&mut self, line: &str, today: NaiveDate) -> Result<Option<LineReport>> {
        let Some(rule) = self.parser.parse_line(line) else {
            return Ok(None);
        };
        let index = self.load_index();
        let mut probe = HistoryProbe {
            store: &self.store,
            cache: &mut self.cache,
            prefix: &self.config.daily_note_prefix,
        };
        let due = due::is_due(
            &rule,
            today,
            &index,
            self.config.max_lookback_days,
            &mut probe,
        );
        Ok(Some(LineReport {
            date: today,
            due,
            rule,
        }))
    }

    /// Load the source page or fail the run.
    fn load_source(&mut self) -> Result<String> {
        match self.store.read(&self.config.source_page) {
            Ok(Some(content)) => Ok(content),
            Ok(None) => Err(RolloError::source_unavailable(
                &self.config.source_page,
                "page not found",
            )),
            Err(e) => Err(RolloError::source_unavailable(
                &self.config.source_page,
                e.to_string(),
            )),
        }
    }

    /// Build the completion index, degrading to empty on failure.
    fn load_index(&self) -> CompletionIndex {
        match self.build_index() {
            Ok(index) => index,
            Err(err) => {
                warn!("{}, continuing with an empty completion index", err);
                CompletionIndex::new()
            }
        }
    }

    fn build_index(&self) -> Result<CompletionIndex> {
        let records = self
            .completions
            .completed_items()
            .map_err(|e| RolloError::index_query(e.to_string()))?;
        debug!("Completion index holds {} record(s)", records.len());
        Ok(CompletionIndex::from_records(records))
    }

    /// Parse the source page and queue the rules that are due.
    fn collect_due(
        &mut self,
        source: &str,
        today: NaiveDate,
        index: &CompletionIndex,
        queue: &mut Vec<ToAddItem>,
        summary: &mut RunSummary,
    ) {
        for line in source.lines() {
            let Some(rule) = self.parser.parse_line(line) else {
                continue;
            };
            summary.rules_parsed += 1;

            if rule.display_text.is_empty() {
                debug!("Skipping rule with empty display text: {}", line);
                continue;
            }

            let mut probe = HistoryProbe {
                store: &self.store,
                cache: &mut self.cache,
                prefix: &self.config.daily_note_prefix,
            };
            if !due::is_due(
                &rule,
                today,
                index,
                self.config.max_lookback_days,
                &mut probe,
            ) {
                continue;
            }
            summary.due += 1;

            let line = format!("- [ ] {}", rule.display_text);
            if queue.iter().any(|item| item.line == line) {
                debug!("Rule item already queued: {}", line);
                continue;
            }
            queue.push(ToAddItem {
                line,
                origin: ItemOrigin::Generated,
            });
        }
    }

    /// Vacuum recent records, re-marking unfinished items and queueing them.
    fn reclaim_history(
        &mut self,
        today: NaiveDate,
        dry_run: bool,
        queue: &mut Vec<ToAddItem>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        for back in 1..=self.config.max_lookback_days {
            let day = today - Duration::days(i64::from(back));
            let name = record_name(&self.config.daily_note_prefix, day);
            let Some(content) = self.cache.read(&self.store, &name) else {
                continue;
            };
            if content.trim().is_empty() {
                continue;
            }
            let Some(rewrite) =
                vacuum::rewrite_unfinished(&content, &self.config.rollover_header)?
            else {
                continue;
            };

            debug!("Reclaimed {} item(s) from {}", rewrite.reclaimed.len(), name);
            for line in &rewrite.reclaimed {
                summary.reclaimed += 1;
                if queue.iter().any(|item| item.line == *line) {
                    debug!("Reclaimed item already queued: {}", line);
                    continue;
                }
                queue.push(ToAddItem {
                    line: line.clone(),
                    origin: ItemOrigin::RolledOver,
                });
            }

            if dry_run {
                summary.rewritten_records += 1;
            } else if self.write_record(&name, &rewrite.content, summary) {
                summary.rewritten_records += 1;
            }
        }
        Ok(())
    }

    /// Merge the queue into today's record.
    fn write_today(
        &mut self,
        today: NaiveDate,
        dry_run: bool,
        queue: &[ToAddItem],
        summary: &mut RunSummary,
    ) -> Result<()> {
        if queue.is_empty() {
            return Ok(());
        }
        let name = record_name(&self.config.daily_note_prefix, today);
        let existing = self.cache.read(&self.store, &name).unwrap_or_default();

        let candidates: Vec<String> = queue.iter().map(|item| item.line.clone()).collect();
        let outcome = merge::merge_into(&existing, &self.config.rollover_header, &candidates)?;

        summary.suppressed = (queue.len() - outcome.appended.len()) as u32;
        for &idx in &outcome.appended {
            match queue[idx].origin {
                ItemOrigin::Generated => summary.added += 1,
                ItemOrigin::RolledOver => summary.rolled_over += 1,
            }
        }

        if !outcome.changed() {
            debug!("All {} candidate(s) already present in {}", queue.len(), name);
            return Ok(());
        }
        if !dry_run {
            self.write_record(&name, &outcome.content, summary);
        }
        Ok(())
    }

    /// Write a record, updating the cache on success.
    ///
    /// On failure the cache keeps the record's previous content, so the
    /// rest of the run reasons about what is actually on disk.
    fn write_record(&mut self, name: &str, content: &str, summary: &mut RunSummary) -> bool {
        match self.store.write(name, content) {
            Ok(()) => {
                self.cache.update(name, content);
                true
            }
            Err(e) => {
                warn!("{}", RolloError::record_io(name, e.to_string()));
                summary.failed_writes += 1;
                false
            }
        }
    }
}
