//! Named reporting periods resolved against a reference day.
//!
//! | preset | window |
//! |---|---|
//! | `7d`, `30d`, `Nd` | `N` days before the reference through the reference |
//! | `q1` .. `q4` | the whole quarter in the reference's year |
//! | `ytd` | January 1 through the reference |
//! | `mtd` | the first of the reference's month through the reference |

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{CalendarError, Result};
use crate::interval::DateRange;
use crate::view::CalendarView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowPreset {
    /// The last `N` days, ending on the reference day.
    LastDays(u32),
    /// A calendar quarter, 1 through 4. Out-of-range values are clamped.
    Quarter(u8),
    YearToDate,
    MonthToDate,
}

impl WindowPreset {
    /// The window this preset names, as seen from `reference`.
    pub fn window(&self, reference: NaiveDate) -> DateRange {
        match *self {
            WindowPreset::LastDays(days) => {
                let first = reference
                    .checked_sub_days(Days::new(u64::from(days)))
                    .unwrap_or(NaiveDate::MIN);
                DateRange::from_ordered(first, reference)
            }
            WindowPreset::Quarter(quarter) => {
                let first_month = u32::from(quarter.clamp(1, 4) - 1) * 3 + 1;
                let first = reference
                    .with_day(1)
                    .and_then(|d| d.with_month(first_month))
                    .unwrap_or(reference);
                let last_month = first.checked_add_months(Months::new(2)).unwrap_or(first);
                let last = CalendarView::Month.window(last_month, Weekday::Mon).end();
                DateRange::from_ordered(first, last)
            }
            WindowPreset::YearToDate => {
                let first = reference.with_ordinal(1).unwrap_or(reference);
                DateRange::from_ordered(first, reference)
            }
            WindowPreset::MonthToDate => {
                let first = reference.with_day(1).unwrap_or(reference);
                DateRange::from_ordered(first, reference)
            }
        }
    }
}

impl fmt::Display for WindowPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPreset::LastDays(days) => write!(f, "{days}d"),
            WindowPreset::Quarter(quarter) => write!(f, "q{quarter}"),
            WindowPreset::YearToDate => f.write_str("ytd"),
            WindowPreset::MonthToDate => f.write_str("mtd"),
        }
    }
}

impl FromStr for WindowPreset {
    type Err = CalendarError;

    /// Parse `7d`, `30d`, `q1`..`q4`, `ytd` or `mtd`, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || CalendarError::UnknownPreset(s.to_string());
        let lower = s.trim().to_ascii_lowercase();

        match lower.as_str() {
            "ytd" => Ok(WindowPreset::YearToDate),
            "mtd" => Ok(WindowPreset::MonthToDate),
            "q1" => Ok(WindowPreset::Quarter(1)),
            "q2" => Ok(WindowPreset::Quarter(2)),
            "q3" => Ok(WindowPreset::Quarter(3)),
            "q4" => Ok(WindowPreset::Quarter(4)),
            other => other
                .strip_suffix('d')
                .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|n| n.parse::<u32>().ok())
                .map(WindowPreset::LastDays)
                .ok_or_else(unknown),
        }
    }
}
