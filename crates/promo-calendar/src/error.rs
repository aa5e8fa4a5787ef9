//! Error types for promo-calendar operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::promotion::PromotionId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid date range: end ({end}) is before start ({start})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown promotion status: {0}")]
    UnknownStatus(String),

    #[error("Unknown calendar view: {0}")]
    UnknownView(String),

    #[error("Unknown period preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Promotion already exists: {0}")]
    DuplicatePromotion(PromotionId),

    #[error("Promotion not found: {0}")]
    PromotionNotFound(PromotionId),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
