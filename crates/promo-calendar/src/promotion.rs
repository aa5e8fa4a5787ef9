//! The promotion record and its identifiers.
//!
//! Records arrive from the data-access layer as flat camelCase JSON. They are
//! validated on the way in: the date range must satisfy `endDate >= startDate`
//! and the status must be one of the four known values. Anything that gets
//! past deserialization or [`Promotion::new`] is well-formed, so the kernel
//! functions never re-check it.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};
use crate::interval::DateRange;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Opaque, unique promotion identifier.
    PromotionId
);
string_id!(
    /// The owning tenant.
    TeamId
);
string_id!(
    /// Sales channel reference (e.g. `oliveyoung`, `coupang`).
    ChannelId
);

/// Lifecycle status, set externally. The kernel only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    Planned,
    Active,
    Ended,
    /// Excluded from conflict detection, still returned by range queries.
    Cancelled,
}

impl PromotionStatus {
    pub const ALL: [PromotionStatus; 4] = [
        PromotionStatus::Planned,
        PromotionStatus::Active,
        PromotionStatus::Ended,
        PromotionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionStatus::Planned => "planned",
            PromotionStatus::Active => "active",
            PromotionStatus::Ended => "ended",
            PromotionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromotionStatus {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planned" => Ok(PromotionStatus::Planned),
            "active" => Ok(PromotionStatus::Active),
            "ended" => Ok(PromotionStatus::Ended),
            "cancelled" => Ok(PromotionStatus::Cancelled),
            _ => Err(CalendarError::UnknownStatus(s.to_string())),
        }
    }
}

/// A scheduled promotion on one sales channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PromotionRecord", into = "PromotionRecord")]
pub struct Promotion {
    pub id: PromotionId,
    pub team_id: TeamId,
    pub channel_id: ChannelId,
    pub title: String,
    pub range: DateRange,
    pub status: PromotionStatus,
    /// Descriptive only (e.g. `percentage`, `fixed_amount`).
    pub discount_type: Option<String>,
    pub discount_value: Option<f64>,
}

impl Promotion {
    pub fn new(
        id: impl Into<PromotionId>,
        team_id: impl Into<TeamId>,
        channel_id: impl Into<ChannelId>,
        range: DateRange,
        status: PromotionStatus,
    ) -> Self {
        Self {
            id: id.into(),
            team_id: team_id.into(),
            channel_id: channel_id.into(),
            title: String::new(),
            range,
            status,
            discount_type: None,
            discount_value: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_discount(mut self, discount_type: impl Into<String>, value: f64) -> Self {
        self.discount_type = Some(discount_type.into());
        self.discount_value = Some(value);
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.range.start()
    }

    pub fn end(&self) -> NaiveDate {
        self.range.end()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == PromotionStatus::Cancelled
    }
}

/// Flat wire shape of a promotion as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRecord {
    pub id: PromotionId,
    pub team_id: TeamId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<f64>,
}

impl TryFrom<PromotionRecord> for Promotion {
    type Error = CalendarError;

    fn try_from(record: PromotionRecord) -> Result<Self> {
        Ok(Promotion {
            range: DateRange::new(record.start_date, record.end_date)?,
            status: record.status.parse()?,
            id: record.id,
            team_id: record.team_id,
            channel_id: record.channel_id,
            title: record.title,
            discount_type: record.discount_type,
            discount_value: record.discount_value,
        })
    }
}

impl From<Promotion> for PromotionRecord {
    fn from(p: Promotion) -> Self {
        PromotionRecord {
            start_date: p.range.start(),
            end_date: p.range.end(),
            status: p.status.as_str().to_string(),
            id: p.id,
            team_id: p.team_id,
            channel_id: p.channel_id,
            title: p.title,
            discount_type: p.discount_type,
            discount_value: p.discount_value,
        }
    }
}
