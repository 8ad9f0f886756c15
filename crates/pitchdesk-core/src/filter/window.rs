//! Date window resolution.
//!
//! Relative tokens resolve against a reference instant supplied by a
//! [`Clock`], never against a hard-coded date. All comparisons use calendar
//! days; time of day is discarded.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::FilterError;

// ============================================================================
// Clock
// ============================================================================

/// Source of the reference instant for relative date tokens.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn at(instant: NaiveDateTime) -> Self {
        Self(instant)
    }

    /// Midnight at the start of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ============================================================================
// Date range tokens
// ============================================================================

/// Selection of the date facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Yesterday,
    Tomorrow,
    ThisWeek,
    Last7Days,
    Last30Days,
    Last90Days,
    Last365Days,
    /// Explicit bounds held in the filter state.
    Custom,
}

impl DateRange {
    /// Every token that resolves without explicit bounds.
    pub const RELATIVE: [DateRange; 9] = [
        DateRange::All,
        DateRange::Today,
        DateRange::Yesterday,
        DateRange::Tomorrow,
        DateRange::ThisWeek,
        DateRange::Last7Days,
        DateRange::Last30Days,
        DateRange::Last90Days,
        DateRange::Last365Days,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::Today => "today",
            DateRange::Yesterday => "yesterday",
            DateRange::Tomorrow => "tomorrow",
            DateRange::ThisWeek => "thisWeek",
            DateRange::Last7Days => "last7Days",
            DateRange::Last30Days => "last30Days",
            DateRange::Last90Days => "last90Days",
            DateRange::Last365Days => "last365Days",
            DateRange::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::All => "Any time",
            DateRange::Today => "Today",
            DateRange::Yesterday => "Yesterday",
            DateRange::Tomorrow => "Tomorrow",
            DateRange::ThisWeek => "Next 7 days",
            DateRange::Last7Days => "Past week",
            DateRange::Last30Days => "Past month",
            DateRange::Last90Days => "Past quarter",
            DateRange::Last365Days => "Past year",
            DateRange::Custom => "Custom range",
        }
    }

    /// Resolve against `now`. `Custom` has no relative meaning and yields `None`.
    pub fn resolve(&self, now: NaiveDateTime) -> Option<DateWindow> {
        let today = now.date();
        let window = match self {
            DateRange::All => DateWindow::UNBOUNDED,
            DateRange::Today => DateWindow::day(today),
            DateRange::Yesterday => DateWindow::day(shift(today, -1)),
            DateRange::Tomorrow => DateWindow::day(shift(today, 1)),
            DateRange::ThisWeek => DateWindow::between(today, shift(today, 7)),
            DateRange::Last7Days => DateWindow::between(shift(today, -7), today),
            DateRange::Last30Days => DateWindow::between(shift(today, -30), today),
            DateRange::Last90Days => DateWindow::between(shift(today, -90), today),
            DateRange::Last365Days => DateWindow::between(shift(today, -365), today),
            DateRange::Custom => return None,
        };
        Some(window)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DateRange {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        std::iter::once(DateRange::Custom)
            .chain(DateRange::RELATIVE)
            .find(|range| range.token().eq_ignore_ascii_case(s.trim()))
            .or_else(|| match s.trim() {
                // Aliases used by the legacy member and team screens
                "week" => Some(DateRange::Last7Days),
                "month" => Some(DateRange::Last30Days),
                "quarter" => Some(DateRange::Last90Days),
                "year" => Some(DateRange::Last365Days),
                _ => None,
            })
            .ok_or_else(|| FilterError::UnknownDateRange(s.to_string()))
    }
}

/// Saturating day shift; out-of-range dates stay put.
fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(date)
}

// ============================================================================
// Date window
// ============================================================================

/// Inclusive calendar-day range; a `None` end is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub const UNBOUNDED: DateWindow = DateWindow { from: None, to: None };

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}
