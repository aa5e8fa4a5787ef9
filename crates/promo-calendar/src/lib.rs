//! # promo-calendar
//!
//! Scheduling kernel for a multi-tenant promotion calendar.
//!
//! Brands plan promotions on sales channels (Olive Young, Coupang, Naver,
//! Kakao, ...). This crate answers the questions the calendar UI asks about
//! them: which promotions fall in a window, which days each one covers, and
//! whether a schedule collides with another promotion on the same channel.
//! Every function is pure and works on records the data-access layer has
//! already fetched.
//!
//! ## Modules
//!
//! - [`interval`] — Inclusive day ranges and the overlap predicate
//! - [`promotion`] — Validated promotion records, ids and statuses
//! - [`query`] — Team-scoped range queries with channel/status filters
//! - [`bucket`] — Per-day bucketing for grid rendering
//! - [`conflict`] — Channel-scoped conflict checks and audits
//! - [`view`] — Month/week/day windows and navigation
//! - [`period`] — Named reporting periods (`7d`, `q1`, `ytd`, ...)
//! - [`lead_time`] — Channel lead-time milestones
//! - [`calendar`] — In-memory, insertion-ordered store
//! - [`error`] — Error types
//!
//! ## Quick start
//!
//! ```rust
//! use promo_calendar::{check_conflicts, ConflictCheck, DateRange, Promotion, PromotionStatus};
//!
//! let existing = vec![Promotion::new(
//!     "p1",
//!     "team-a",
//!     "oliveyoung",
//!     DateRange::parse("2026-02-01", "2026-02-05").unwrap(),
//!     PromotionStatus::Planned,
//! )];
//!
//! // Ending and starting on the same day counts as an overlap.
//! let candidate = DateRange::parse("2026-02-05", "2026-02-10").unwrap();
//! let report = check_conflicts(&existing, &ConflictCheck::new("team-a", "oliveyoung", candidate));
//! assert!(report.has_conflict);
//! ```

pub mod bucket;
pub mod calendar;
pub mod conflict;
pub mod error;
pub mod interval;
pub mod lead_time;
pub mod period;
pub mod promotion;
pub mod query;
pub mod view;

pub use bucket::{bucket_by_day, day_key, DayBuckets, KeyedBuckets};
pub use calendar::PromotionCalendar;
pub use conflict::{
    check_conflicts, find_channel_conflicts, ConflictCheck, ConflictPair, ConflictReport,
};
pub use error::CalendarError;
pub use interval::{overlaps, parse_date, DateRange};
pub use lead_time::{LeadTimePlan, LeadTimeProfile, LeadTimeTable};
pub use period::WindowPreset;
pub use promotion::{ChannelId, Promotion, PromotionId, PromotionRecord, PromotionStatus, TeamId};
pub use query::{range_query, RangeQuery};
pub use view::{parse_weekday, CalendarView};
