//! Reclaiming unfinished items from past daily records.
//!
//! The vacuum inspects the rollover section of a past record. Every
//! unfinished item in that section is re-marked in place with `[>]` so the
//! record shows it moved on, and a normalized copy is handed back to the
//! engine for insertion into today's record.

use anyhow::{Context, Result};
use regex::Regex;

/// Result of vacuuming one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRewrite {
    /// Full record content with unfinished items re-marked as moved
    pub content: String,
    /// Normalized `- [ ] text` lines for the items that moved
    pub reclaimed: Vec<String>,
}

/// Re-mark unfinished items in a record's rollover section.
///
/// The section starts after the first line whose trimmed text equals
/// `header` and ends at the next heading line or end of input. Returns
/// `None` when the record has no such section or nothing to reclaim,
/// leaving the record untouched.
pub fn rewrite_unfinished(content: &str, header: &str) -> Result<Option<SectionRewrite>> {
    let unfinished = Regex::new(r"^(\s*)-\s+\[ \]\s+(.+)$")
        .context("Failed to compile unfinished item regex")?;

    let mut lines: Vec<String> = Vec::new();
    let mut reclaimed = Vec::new();
    let mut seen_header = false;
    let mut in_section = false;

    for line in content.lines() {
        if !seen_header && line.trim() == header {
            seen_header = true;
            in_section = true;
            lines.push(line.to_string());
            continue;
        }
        if in_section && line.trim_start().starts_with('#') {
            in_section = false;
        }
        if in_section {
            if let Some(caps) = unfinished.captures(line) {
                reclaimed.push(format!("- [ ] {}", &caps[2]));
                lines.push(format!("{}- [>] {}", &caps[1], &caps[2]));
                continue;
            }
        }
        lines.push(line.to_string());
    }

    if reclaimed.is_empty() {
        return Ok(None);
    }

    let mut rewritten = lines.join("\n");
    if content.ends_with('\n') {
        rewritten.push('\n');
    }
    Ok(Some(SectionRewrite {
        content: rewritten,
        reclaimed,
    }))
}
