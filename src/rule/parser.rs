//! Parsing of recurrence directives from source-page lines.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use super::{RecurrenceRule, Strategy, Unit};

/// Parser for inline recurrence directives.
///
/// Holds the compiled patterns so a single instance can scan an entire
/// source page without recompiling per line.
#[derive(Debug, Clone)]
pub struct LineParser {
    recur: Regex,
    anchor: Regex,
    strategy: Regex,
    include: Regex,
    marker: Regex,
    directive: Regex,
}

impl LineParser {
    /// Compile the directive patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            recur: Regex::new(r"\[recur:\s*([a-z]+)_(\d+)\s*\]")
                .context("Failed to compile recur directive regex")?,
            anchor: Regex::new(r"\[start:\s*(\d{4}-\d{2}-\d{2})\s*\]")
                .context("Failed to compile start directive regex")?,
            strategy: Regex::new(r"\[strategy:\s*(\w+)\s*\]")
                .context("Failed to compile strategy directive regex")?,
            include: Regex::new(r"\[include:\s*(\w+)\s*\]")
                .context("Failed to compile include directive regex")?,
            marker: Regex::new(r"^\s*[-*]\s+\[[^\]]*\]\s*")
                .context("Failed to compile list marker regex")?,
            directive: Regex::new(r"\[(?:recur|start|strategy|include):[^\]]*\]")
                .context("Failed to compile directive stripper regex")?,
        })
    }

    /// Parse a single line into a recurrence rule.
    ///
    /// Returns `None` when the line carries no well-formed `[recur: ...]`
    /// directive. Malformed secondary directives do not disqualify the
    /// line; the affected field falls back to its default.
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<RecurrenceRule> {
        let caps = self.recur.captures(line)?;

        let unit = match caps[1].parse::<Unit>() {
            Ok(unit) => unit,
            Err(_) => {
                debug!("Unknown recurrence unit '{}', skipping line", &caps[1]);
                return None;
            }
        };
        let frequency = match caps[2].parse::<u32>() {
            Ok(f) if f >= 1 => f,
            _ => {
                debug!("Invalid recurrence frequency '{}', skipping line", &caps[2]);
                return None;
            }
        };

        let anchor = self.anchor.captures(line).and_then(|c| {
            match NaiveDate::parse_from_str(&c[1], "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    debug!("Invalid start date '{}', treating rule as unanchored", &c[1]);
                    None
                }
            }
        });

        let strategy = self.strategy.captures(line).map_or_else(Strategy::default, |c| {
            c[1].parse::<Strategy>().unwrap_or_else(|_| {
                debug!("Unknown strategy '{}', falling back to strict", &c[1]);
                Strategy::Strict
            })
        });

        let include_weekend = self.include.captures(line).is_some_and(|c| {
            if &c[1] == "weekend" {
                true
            } else {
                debug!("Unknown include token '{}', ignoring", &c[1]);
                false
            }
        });

        Some(RecurrenceRule {
            unit,
            frequency,
            anchor,
            strategy,
            include_weekend,
            display_text: self.display_text(line),
        })
    }

    /// Strip the list marker and all directives from a line.
    ///
    /// Only the edges are trimmed; interior spacing left behind by removed
    /// directives is preserved.
    #[must_use]
    pub fn display_text(&self, line: &str) -> String {
        let stripped = self.marker.replace(line, "");
        self.directive.replace_all(&stripped, "").trim().to_string()
    }
}
