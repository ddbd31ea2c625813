//! Due-day evaluation.
//!
//! The entry point is [`is_due`], which applies the weekend gate and then
//! dispatches on the rule's strategy: calendar-aligned rules go through the
//! strict backward scan in [`strict`], completion-relative rules through the
//! elapsed-day comparison in [`completion`].

pub mod completion;
pub mod strict;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::completion::CompletionIndex;
use crate::rule::{RecurrenceRule, Strategy};

/// Evidence lookup for the strict backward scan.
///
/// Answers whether a daily record exists for a given day. The engine backs
/// this with its memoized record cache; tests and benchmarks substitute
/// fixed maps.
pub trait RecordProbe {
    /// Check whether a daily record exists for `day`.
    fn record_exists(&mut self, day: NaiveDate) -> bool;
}

/// Decide whether a rule is due on `today`.
///
/// Weekend days short-circuit to `false` unless the rule opts in with
/// `include_weekend`; no strategy logic runs in that case.
#[must_use]
pub fn is_due(
    rule: &RecurrenceRule,
    today: NaiveDate,
    index: &CompletionIndex,
    lookback_days: u32,
    probe: &mut dyn RecordProbe,
) -> bool {
    if is_weekend(today) && !rule.include_weekend {
        debug!(
            "{} falls on a weekend, '{}' not considered",
            today, rule.display_text
        );
        return false;
    }

    match rule.strategy {
        Strategy::Strict => strict::evaluate(rule, today, lookback_days, probe),
        Strategy::Completion => completion::evaluate(rule, today, index),
    }
}

/// Check whether a day falls on Saturday or Sunday.
#[must_use]
pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}
