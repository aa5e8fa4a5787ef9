//! Month, week and day windows for calendar navigation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};
use crate::interval::DateRange;

/// A calendar page granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarView::Month => "month",
            CalendarView::Week => "week",
            CalendarView::Day => "day",
        }
    }

    /// The window of days shown for the page containing `anchor`.
    ///
    /// - `Month`: first to last day of the anchor's month.
    /// - `Week`: seven days starting on the most recent `week_start` on or before the anchor.
    /// - `Day`: the anchor alone.
    pub fn window(&self, anchor: NaiveDate, week_start: Weekday) -> DateRange {
        match self {
            CalendarView::Month => {
                let first = anchor.with_day(1).unwrap_or(anchor);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                DateRange::from_ordered(first, last)
            }
            CalendarView::Week => {
                let offset = (7 + anchor.weekday().num_days_from_monday()
                    - week_start.num_days_from_monday())
                    % 7;
                let first = anchor
                    .checked_sub_days(Days::new(u64::from(offset)))
                    .unwrap_or(NaiveDate::MIN);
                let last = first.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
                DateRange::from_ordered(first, last)
            }
            CalendarView::Day => DateRange::single_day(anchor),
        }
    }

    /// Move the anchor by `steps` pages (negative goes back).
    ///
    /// Month steps keep the day of month, clamped to the target month's length
    /// (Jan 31 + 1 month is Feb 28/29). Dates beyond chrono's range leave the
    /// anchor unchanged.
    pub fn step(&self, anchor: NaiveDate, steps: i32) -> NaiveDate {
        let moved = match self {
            CalendarView::Month => {
                let months = Months::new(steps.unsigned_abs());
                if steps >= 0 {
                    anchor.checked_add_months(months)
                } else {
                    anchor.checked_sub_months(months)
                }
            }
            CalendarView::Week => anchor.checked_add_signed(TimeDelta::weeks(i64::from(steps))),
            CalendarView::Day => anchor.checked_add_signed(TimeDelta::days(i64::from(steps))),
        };
        moved.unwrap_or(anchor)
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarView {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(CalendarView::Month),
            "week" => Ok(CalendarView::Week),
            "day" => Ok(CalendarView::Day),
            _ => Err(CalendarError::UnknownView(s.to_string())),
        }
    }
}

/// Parse a weekday name such as `monday`, `Sun` or `sat`.
///
/// # Errors
/// Returns `CalendarError::InvalidWeekday` for anything chrono does not recognise.
pub fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| CalendarError::InvalidWeekday(s.to_string()))
}
