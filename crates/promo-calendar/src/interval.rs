//! Inclusive calendar-day ranges and the overlap predicate.
//!
//! A [`DateRange`] covers every day from `start` to `end`, both included, and
//! can only be built when `end >= start`. Two ranges overlap when they share at
//! least one day, so a range ending on day D overlaps one starting on day D.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// Canonical day format used for parsing and for day-bucket keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive `[start, end]` range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unvalidated wire shape, checked through [`DateRange::new`].
#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = CalendarError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Build a range, rejecting `end < start`.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidRange` when `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(CalendarError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// For callers that computed `start <= end` themselves.
    pub(crate) fn from_ordered(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "from_ordered: {start} > {end}");
        Self { start, end }
    }

    /// A range covering exactly one day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Parse a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidDate` if either string is not a valid day,
    /// or `CalendarError::InvalidRange` if `end` precedes `start`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the two ranges share at least one day.
    ///
    /// Equivalent to `self.start <= other.end && self.end >= other.start`.
    /// Symmetric, and true for a range compared with itself.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// The days shared by both ranges, or `None` when they are disjoint.
    ///
    /// Clipping a promotion to a query window is `promotion.intersection(&window)`.
    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        if !self.overlaps(other) {
            return None;
        }
        Some(DateRange {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of days covered, counting both ends. Always at least 1.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every day in the range, in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Free-function form of [`DateRange::overlaps`].
pub fn overlaps(a: &DateRange, b: &DateRange) -> bool {
    a.overlaps(b)
}

/// Parse a `YYYY-MM-DD` day, ignoring surrounding whitespace.
///
/// # Errors
/// Returns `CalendarError::InvalidDate` naming the rejected input.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| CalendarError::InvalidDate(format!("'{}': {}", s, e)))
}
