//! Duplicate-suppressing insertion into today's record.
//!
//! Candidate lines are appended at the end of the record, under the
//! rollover header when the record does not already contain one. A
//! candidate is suppressed when any line in the record carries the same
//! core text behind a list marker, whatever the marker state, so an item
//! completed or moved earlier today is not re-added.

use anyhow::{Context, Result};
use regex::Regex;

/// Result of merging candidates into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Record content after the merge
    pub content: String,
    /// Indices of the candidates that were appended
    pub appended: Vec<usize>,
}

impl MergeOutcome {
    /// Check whether the merge changed the record.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.appended.is_empty()
    }
}

/// Merge candidate lines into a record.
///
/// Suppression compares core text only: the candidate's list marker is
/// stripped and matched against every line of the record behind any
/// marker state. Appends land at the very end of the record even when the
/// header sits mid-document.
pub fn merge_into(existing: &str, header: &str, candidates: &[String]) -> Result<MergeOutcome> {
    let marker = Regex::new(r"^\s*[-*]\s+\[[^\]]*\]\s*")
        .context("Failed to compile list marker regex")?;

    let mut appended = Vec::new();
    let mut additions: Vec<&String> = Vec::new();

    for (idx, candidate) in candidates.iter().enumerate() {
        let core = marker.replace(candidate, "");
        let pattern = format!(
            r"(?m)^\s*[-*]\s+\[[^\]]*\]\s*{}\s*$",
            regex::escape(&core)
        );
        let present = Regex::new(&pattern)
            .context("Failed to compile duplicate detection regex")?;
        if present.is_match(existing) {
            continue;
        }
        appended.push(idx);
        additions.push(candidate);
    }

    if additions.is_empty() {
        return Ok(MergeOutcome {
            content: existing.to_string(),
            appended,
        });
    }

    let has_header = existing.lines().any(|line| line.trim() == header);

    let mut content = existing.to_string();
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    if !has_header {
        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(header);
        content.push('\n');
    }
    for line in additions {
        content.push_str(line);
        content.push('\n');
    }

    Ok(MergeOutcome { content, appended })
}
