//! An in-memory, insertion-ordered promotion calendar.
//!
//! Stands in for the data-access layer: it owns the records, keeps them in
//! creation order (which is what breaks start-date ties in range queries) and
//! scopes every read to a single team before handing off to the pure kernel
//! functions.
//!
//! Creating or editing a promotion returns the advisory [`ConflictReport`] for
//! its new schedule. The write always goes through.

use tracing::{debug, warn};

use crate::bucket::{bucket_by_day, DayBuckets};
use crate::conflict::{
    check_conflicts, find_channel_conflicts, ConflictCheck, ConflictPair, ConflictReport,
};
use crate::error::{CalendarError, Result};
use crate::promotion::{Promotion, PromotionId, PromotionStatus, TeamId};
use crate::query::{range_query, RangeQuery};

#[derive(Debug, Clone, Default)]
pub struct PromotionCalendar {
    promotions: Vec<Promotion>,
}

impl PromotionCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a calendar from records in creation order.
    ///
    /// # Errors
    /// Returns `CalendarError::DuplicatePromotion` if two records share an id.
    pub fn from_promotions(promotions: impl IntoIterator<Item = Promotion>) -> Result<Self> {
        let mut calendar = Self::new();
        for promotion in promotions {
            calendar.push(promotion)?;
        }
        Ok(calendar)
    }

    pub fn len(&self) -> usize {
        self.promotions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.promotions.is_empty()
    }

    /// All records, every team, in creation order.
    pub fn all(&self) -> &[Promotion] {
        &self.promotions
    }

    pub fn get(&self, id: &PromotionId) -> Option<&Promotion> {
        self.promotions.iter().find(|p| &p.id == id)
    }

    /// A team's promotions in creation order.
    pub fn team_promotions(&self, team_id: &TeamId) -> Vec<&Promotion> {
        self.promotions
            .iter()
            .filter(|p| &p.team_id == team_id)
            .collect()
    }

    /// Add a promotion and report what it conflicts with.
    ///
    /// # Errors
    /// Returns `CalendarError::DuplicatePromotion` if the id is taken.
    pub fn insert(&mut self, promotion: Promotion) -> Result<ConflictReport<'_>> {
        let check = conflict_check_for(&promotion);
        self.push(promotion)?;
        Ok(self.report_for(check.as_ref(), "created"))
    }

    /// Replace a promotion by id, e.g. after its dates or channel changed.
    ///
    /// The edited promotion keeps its creation position and never conflicts
    /// with itself.
    ///
    /// # Errors
    /// Returns `CalendarError::PromotionNotFound` if no record has that id.
    pub fn update(&mut self, promotion: Promotion) -> Result<ConflictReport<'_>> {
        let slot = self
            .promotions
            .iter_mut()
            .find(|p| p.id == promotion.id)
            .ok_or_else(|| CalendarError::PromotionNotFound(promotion.id.clone()))?;
        let check = conflict_check_for(&promotion);
        *slot = promotion;
        Ok(self.report_for(check.as_ref(), "updated"))
    }

    /// Mark a promotion cancelled. It stays queryable but stops conflicting.
    ///
    /// # Errors
    /// Returns `CalendarError::PromotionNotFound` if no record has that id.
    pub fn cancel(&mut self, id: &PromotionId) -> Result<&Promotion> {
        let promotion = self
            .promotions
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CalendarError::PromotionNotFound(id.clone()))?;
        promotion.status = PromotionStatus::Cancelled;
        debug!(promotion = %id, "promotion cancelled");
        Ok(promotion)
    }

    /// Delete a promotion, returning it.
    ///
    /// # Errors
    /// Returns `CalendarError::PromotionNotFound` if no record has that id.
    pub fn remove(&mut self, id: &PromotionId) -> Result<Promotion> {
        let index = self
            .promotions
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CalendarError::PromotionNotFound(id.clone()))?;
        debug!(promotion = %id, "promotion removed");
        Ok(self.promotions.remove(index))
    }

    pub fn range_query(&self, query: &RangeQuery) -> Vec<&Promotion> {
        range_query(&self.promotions, query)
    }

    /// Range query followed by day bucketing over the same window.
    pub fn bucket(&self, query: &RangeQuery) -> DayBuckets<'_> {
        bucket_by_day(self.range_query(query), &query.window)
    }

    pub fn check_conflicts(&self, check: &ConflictCheck) -> ConflictReport<'_> {
        check_conflicts(&self.promotions, check)
    }

    pub fn audit_conflicts(&self, team_id: &TeamId) -> Vec<ConflictPair<'_>> {
        find_channel_conflicts(&self.promotions, team_id)
    }

    fn push(&mut self, promotion: Promotion) -> Result<()> {
        if self.get(&promotion.id).is_some() {
            return Err(CalendarError::DuplicatePromotion(promotion.id));
        }
        debug!(
            promotion = %promotion.id,
            team = %promotion.team_id,
            channel = %promotion.channel_id,
            range = %promotion.range,
            "promotion added"
        );
        self.promotions.push(promotion);
        Ok(())
    }

    fn report_for(&self, check: Option<&ConflictCheck>, action: &str) -> ConflictReport<'_> {
        let Some(check) = check else {
            return ConflictReport {
                has_conflict: false,
                conflicts: Vec::new(),
            };
        };
        let report = self.check_conflicts(check);
        if report.has_conflict {
            warn!(
                promotion = ?check.exclude_id,
                channel = %check.channel_id,
                range = %check.range,
                conflicts = report.conflicts.len(),
                "{} promotion overlaps existing promotions on the same channel",
                action
            );
        }
        report
    }
}

/// Cancelled promotions never conflict, so they need no check.
fn conflict_check_for(promotion: &Promotion) -> Option<ConflictCheck> {
    (!promotion.is_cancelled()).then(|| ConflictCheck::for_promotion(promotion))
}
