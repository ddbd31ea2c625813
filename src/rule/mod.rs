//! Recurrence rules and the directive parser that produces them.
//!
//! A recurrence rule is declared inline on a list item with bracketed
//! directives, e.g.:
//!
//! ```text
//! - [ ] Water plants [recur: day_3] [start: 2025-01-15]
//! ```
//!
//! The `[recur: unit_frequency]` directive is mandatory; `[start: ...]`,
//! `[strategy: ...]` and `[include: weekend]` refine it.

pub mod parser;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use parser::LineParser;

/// Calendar unit of a recurrence rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Unit {
    /// Lowercase name as written in directives
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown unit name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseUnitError(String);

impl fmt::Display for ParseUnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown recurrence unit: {}", self.0)
    }
}

impl std::error::Error for ParseUnitError {}

impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(ParseUnitError(other.to_string())),
        }
    }
}

/// How due days are decided for a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Calendar-aligned: due days follow the anchor (or an epoch grid)
    /// regardless of when the item was last completed
    #[default]
    Strict,
    /// Completion-relative: due once enough days have elapsed since the
    /// most recent completion
    Completion,
}

impl Strategy {
    /// Lowercase name as written in directives
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Completion => "completion",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strategy: {}", self.0)
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "completion" => Ok(Self::Completion),
            other => Err(ParseStrategyError(other.to_string())),
        }
    }
}

/// A recurrence rule parsed from a single source-page line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Calendar unit of the cadence
    pub unit: Unit,

    /// Number of units between occurrences (always >= 1)
    pub frequency: u32,

    /// Optional date the cadence counts from
    pub anchor: Option<NaiveDate>,

    /// Due-day decision strategy
    pub strategy: Strategy,

    /// Whether the item may fall due on Saturday or Sunday
    pub include_weekend: bool,

    /// Item text with the list marker and all directives stripped
    pub display_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Unit Tests
    // =========================================================================

    #[test]
    fn test_unit_from_str() {
        assert_eq!("day".parse::<Unit>(), Ok(Unit::Day));
        assert_eq!("week".parse::<Unit>(), Ok(Unit::Week));
        assert_eq!("month".parse::<Unit>(), Ok(Unit::Month));
        assert_eq!("quarter".parse::<Unit>(), Ok(Unit::Quarter));
        assert_eq!("year".parse::<Unit>(), Ok(Unit::Year));
    }

    #[test]
    fn test_unit_from_str_rejects_unknown() {
        let err = "fortnight".parse::<Unit>().expect_err("Parse should fail");
        assert_eq!(err.to_string(), "unknown recurrence unit: fortnight");
    }

    #[test]
    fn test_unit_from_str_is_case_sensitive() {
        assert!("Day".parse::<Unit>().is_err());
        assert!("WEEK".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_display_round_trip() {
        for unit in [Unit::Day, Unit::Week, Unit::Month, Unit::Quarter, Unit::Year] {
            assert_eq!(unit.to_string().parse::<Unit>(), Ok(unit));
        }
    }

    // =========================================================================
    // Strategy Tests
    // =========================================================================

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("strict".parse::<Strategy>(), Ok(Strategy::Strict));
        assert_eq!("completion".parse::<Strategy>(), Ok(Strategy::Completion));
        assert!("sometimes".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_default_is_strict() {
        assert_eq!(Strategy::default(), Strategy::Strict);
    }

    // =========================================================================
    // Serialization Tests
    // =========================================================================

    #[test]
    fn test_rule_serializes_lowercase() {
        let rule = RecurrenceRule {
            unit: Unit::Week,
            frequency: 2,
            anchor: None,
            strategy: Strategy::Completion,
            include_weekend: false,
            display_text: "Review inbox".to_string(),
        };
        let json = serde_json::to_string(&rule).expect("Serialization should succeed");
        assert!(json.contains(r#""unit":"week""#));
        assert!(json.contains(r#""strategy":"completion""#));
    }
}
