//! Per-day bucketing for calendar grid rendering.
//!
//! Each promotion is clipped to the window and placed in the bucket of every
//! day it still covers. A promotion covering N clipped days lands in exactly N
//! buckets, once per bucket, even if the input lists it more than once. Days
//! that no promotion covers get no bucket.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::interval::{DateRange, DATE_FORMAT};
use crate::promotion::{Promotion, PromotionId};

/// Day buckets keyed by canonical `YYYY-MM-DD` strings, holding promotion ids.
pub type KeyedBuckets = BTreeMap<String, Vec<PromotionId>>;

/// Canonical `YYYY-MM-DD` key for a day.
pub fn day_key(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Promotions grouped by the calendar days they cover within a window.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBuckets<'a> {
    window: DateRange,
    days: BTreeMap<NaiveDate, Vec<&'a Promotion>>,
}

impl<'a> DayBuckets<'a> {
    /// The window the buckets were clipped to.
    pub fn window(&self) -> DateRange {
        self.window
    }

    /// Promotions covering `day`, in input order. Empty for uncovered days.
    pub fn get(&self, day: NaiveDate) -> &[&'a Promotion] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Covered days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Promotion])> + '_ {
        self.days.iter().map(|(day, promos)| (*day, promos.as_slice()))
    }

    /// Number of covered days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Size of the busiest bucket, i.e. the number of stacked rows a grid cell needs.
    pub fn max_per_day(&self) -> usize {
        self.days.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Serializable form keyed by `YYYY-MM-DD`.
    pub fn to_keyed(&self) -> KeyedBuckets {
        self.days
            .iter()
            .map(|(day, promos)| (day_key(*day), promos.iter().map(|p| p.id.clone()).collect()))
            .collect()
    }
}

/// Expand promotions into one bucket entry per covered day within `window`.
///
/// Promotions that do not touch the window are ignored. Duplicate ids are
/// bucketed once, keeping the first occurrence.
pub fn bucket_by_day<'a, I>(promotions: I, window: &DateRange) -> DayBuckets<'a>
where
    I: IntoIterator<Item = &'a Promotion>,
{
    let mut days: BTreeMap<NaiveDate, Vec<&'a Promotion>> = BTreeMap::new();
    let mut seen: HashSet<&'a PromotionId> = HashSet::new();

    for promotion in promotions {
        let Some(clipped) = promotion.range.intersection(window) else {
            continue;
        };
        if !seen.insert(&promotion.id) {
            continue;
        }
        for day in clipped.days() {
            days.entry(day).or_default().push(promotion);
        }
    }

    debug!(
        window = %window,
        promotions = seen.len(),
        days = days.len(),
        "bucketed promotions by day"
    );

    DayBuckets {
        window: *window,
        days,
    }
}
