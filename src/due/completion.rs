//! Completion-relative due evaluation.
//!
//! A completion rule measures elapsed whole days against a reference point:
//! the most recent completion of the item, or the anchor when nothing was
//! ever completed. Elapsed time at or past the rule's threshold makes the
//! item due again.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use crate::completion::CompletionIndex;
use crate::rule::{RecurrenceRule, Unit};

/// Seconds in a civil day
const DAY_SECONDS: i64 = 86_400;

/// Decide whether a completion-relative rule is due on `today`.
///
/// An item with neither a completion on record nor an anchor has no
/// reference to measure from and is always due. Quarter and year rules have
/// no elapsed-day threshold and never fire once a reference exists.
#[must_use]
pub fn evaluate(rule: &RecurrenceRule, today: NaiveDate, index: &CompletionIndex) -> bool {
    let reference = index
        .latest(&rule.display_text)
        .or_else(|| rule.anchor.map(day_start));

    let Some(reference) = reference else {
        debug!("'{}' has no completion or anchor, due", rule.display_text);
        return true;
    };

    let Some(threshold) = threshold_days(rule) else {
        return false;
    };

    let elapsed = (day_start(today) - reference)
        .num_seconds()
        .div_euclid(DAY_SECONDS);
    debug!(
        "'{}' last seen {} day(s) ago, threshold {}",
        rule.display_text, elapsed, threshold
    );
    elapsed >= threshold
}

/// Elapsed-day threshold for a rule, if its unit has one.
///
/// Months are approximated as a flat 30 days under this strategy.
fn threshold_days(rule: &RecurrenceRule) -> Option<i64> {
    let freq = i64::from(rule.frequency);
    match rule.unit {
        Unit::Day => Some(freq),
        Unit::Week => Some(freq * 7),
        Unit::Month => Some(freq * 30),
        Unit::Quarter | Unit::Year => None,
    }
}

/// Midnight UTC at the start of a day.
pub(crate) fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionRecord;
    use crate::rule::Strategy;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).single().expect("valid time")
    }

    fn rule(unit: Unit, frequency: u32, anchor: Option<NaiveDate>) -> RecurrenceRule {
        RecurrenceRule {
            unit,
            frequency,
            anchor,
            strategy: Strategy::Completion,
            include_weekend: false,
            display_text: "Mow lawn".to_string(),
        }
    }

    fn index_with(completed_at: DateTime<Utc>) -> CompletionIndex {
        CompletionIndex::from_records(vec![CompletionRecord {
            display_name: "Mow lawn".to_string(),
            completed_at,
        }])
    }

    // =========================================================================
    // Reference Resolution
    // =========================================================================

    #[test]
    fn test_no_reference_is_always_due() {
        let index = CompletionIndex::new();
        assert!(evaluate(&rule(Unit::Day, 4, None), date(2025, 6, 10), &index));
        // Even for units without a threshold
        assert!(evaluate(&rule(Unit::Quarter, 1, None), date(2025, 6, 10), &index));
        assert!(evaluate(&rule(Unit::Year, 1, None), date(2025, 6, 10), &index));
    }

    #[test]
    fn test_anchor_substitutes_for_missing_completion() {
        let index = CompletionIndex::new();
        let r = rule(Unit::Week, 1, Some(date(2025, 6, 1)));
        assert!(!evaluate(&r, date(2025, 6, 7), &index)); // six days
        assert!(evaluate(&r, date(2025, 6, 8), &index)); // seven days
    }

    #[test]
    fn test_completion_takes_precedence_over_anchor() {
        let r = rule(Unit::Day, 4, Some(date(2025, 1, 1)));
        let index = index_with(at(2025, 6, 8, 12, 0));
        // Anchor alone would be long past threshold; the completion resets it
        assert!(!evaluate(&r, date(2025, 6, 10), &index));
    }

    // =========================================================================
    // Elapsed Day Arithmetic
    // =========================================================================

    #[test]
    fn test_day_threshold_boundary() {
        let r = rule(Unit::Day, 4, None);
        // Completed at midnight four days before: exactly at threshold
        assert!(evaluate(&r, date(2025, 6, 10), &index_with(at(2025, 6, 6, 0, 0))));
        // A minute earlier pushes elapsed to four as well
        assert!(evaluate(&r, date(2025, 6, 10), &index_with(at(2025, 6, 5, 23, 59))));
    }

    #[test]
    fn test_partial_days_round_down() {
        let r = rule(Unit::Day, 4, None);
        // Completed mid-afternoon three and a half days ago: floor is 3
        assert!(!evaluate(&r, date(2025, 6, 10), &index_with(at(2025, 6, 6, 15, 30))));
    }

    #[test]
    fn test_future_completion_is_not_due() {
        let r = rule(Unit::Day, 1, None);
        assert!(!evaluate(&r, date(2025, 6, 10), &index_with(at(2025, 6, 11, 8, 0))));
    }

    #[test]
    fn test_week_threshold_is_seven_per_unit() {
        let r = rule(Unit::Week, 2, None);
        assert!(!evaluate(&r, date(2025, 6, 14), &index_with(at(2025, 6, 1, 0, 0))));
        assert!(evaluate(&r, date(2025, 6, 15), &index_with(at(2025, 6, 1, 0, 0))));
    }

    #[test]
    fn test_month_threshold_is_thirty_days() {
        let r = rule(Unit::Month, 1, None);
        assert!(!evaluate(&r, date(2025, 7, 1), &index_with(at(2025, 6, 2, 0, 0))));
        assert!(evaluate(&r, date(2025, 7, 2), &index_with(at(2025, 6, 2, 0, 0))));
    }

    // =========================================================================
    // Units Without Thresholds
    // =========================================================================

    #[test]
    fn test_quarter_with_reference_never_fires() {
        let r = rule(Unit::Quarter, 1, None);
        assert!(!evaluate(&r, date(2025, 6, 10), &index_with(at(2020, 1, 1, 0, 0))));
    }

    #[test]
    fn test_year_with_anchor_never_fires() {
        let r = rule(Unit::Year, 1, Some(date(2020, 1, 1)));
        let index = CompletionIndex::new();
        assert!(!evaluate(&r, date(2025, 6, 10), &index));
    }
}
