//! Calendar-aligned due evaluation.
//!
//! A strict rule is due on days that line up with its anchor (or, for
//! unanchored rules, with a fixed epoch grid). Because a due day can slip
//! past unobserved, [`evaluate`] scans backwards over the lookback window:
//! the first due day found decides the outcome, using the existence of that
//! day's record as evidence the occurrence was already handled.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use super::RecordProbe;
use crate::rule::{RecurrenceRule, Unit};

/// Check whether a rule's cadence lands on a specific day.
///
/// Anchored rules count from the anchor and never fire before it (except
/// month and quarter rules, whose month arithmetic is symmetric around the
/// anchor). Unanchored rules fall back to fixed calendar grids.
#[must_use]
pub fn is_due_on(rule: &RecurrenceRule, day: NaiveDate) -> bool {
    let freq = i64::from(rule.frequency);

    match (rule.unit, rule.anchor) {
        (Unit::Day, Some(anchor)) => {
            let elapsed = (day - anchor).num_days();
            elapsed >= 0 && elapsed % freq == 0
        }
        (Unit::Day, None) => epoch_days(day).rem_euclid(freq) == 0,

        (Unit::Week, Some(anchor)) => {
            let elapsed = (day - anchor).num_days();
            day.weekday() == anchor.weekday() && elapsed >= 0 && (elapsed / 7) % freq == 0
        }
        (Unit::Week, None) => {
            day.weekday() == Weekday::Mon && epoch_days(day).div_euclid(7) % freq == 0
        }

        (Unit::Month, Some(anchor)) => {
            day.day() == anchor.day() && months_between(anchor, day) % freq == 0
        }
        (Unit::Month, None) => day.day() == 1 && i64::from(day.month()) % freq == 0,

        (Unit::Quarter, Some(anchor)) => {
            day.day() == anchor.day() && months_between(anchor, day) % (3 * freq) == 0
        }
        // Unanchored quarters map to calendar quarter starts; the
        // frequency does not further thin them out.
        (Unit::Quarter, None) => day.day() == 1 && (day.month() - 1) % 3 == 0,

        (Unit::Year, Some(anchor)) => {
            day.day() == anchor.day()
                && day.month() == anchor.month()
                && i64::from(day.year() - anchor.year()) % freq == 0
        }
        (Unit::Year, None) => day.month() == 1 && day.day() == 1,
    }
}

/// Backward scan over the lookback window.
///
/// Walks from `today` back over `lookback_days` days and stops at the first
/// day the cadence lands on. Today itself is due outright; a past due day is
/// due only when no record exists for it, since a record written that day
/// means the occurrence was seen. No due day in the window means nothing is
/// outstanding.
#[must_use]
pub fn evaluate(
    rule: &RecurrenceRule,
    today: NaiveDate,
    lookback_days: u32,
    probe: &mut dyn RecordProbe,
) -> bool {
    for back in 0..=lookback_days {
        let day = today - Duration::days(i64::from(back));
        if !is_due_on(rule, day) {
            continue;
        }
        if back == 0 {
            return true;
        }
        let handled = probe.record_exists(day);
        debug!(
            "'{}' was due {} day(s) ago, record {}",
            rule.display_text,
            back,
            if handled { "exists" } else { "missing" }
        );
        return !handled;
    }
    false
}

/// Days since 1970-01-01, the grid origin for unanchored rules.
fn epoch_days(day: NaiveDate) -> i64 {
    // NaiveDate::default() is 1970-01-01
    (day - NaiveDate::default()).num_days()
}

/// Whole-month distance from `from` to `to`, ignoring days of month.
fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}
