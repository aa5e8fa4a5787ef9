//! Detect overlapping promotions on the same sales channel.
//!
//! Conflicts are advisory: they are reported to the caller as a warning and
//! never block a promotion from being created or edited.
//!
//! Two promotions conflict when they belong to the same team and channel,
//! neither is cancelled, and their inclusive day ranges overlap. A promotion
//! ending on the day another starts IS a conflict. Promotions on different
//! channels never conflict, whatever their dates.

use serde::Serialize;
use tracing::debug;

use crate::interval::DateRange;
use crate::promotion::{ChannelId, Promotion, PromotionId, TeamId};

/// A candidate schedule to check against existing promotions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictCheck {
    pub team_id: TeamId,
    pub channel_id: ChannelId,
    pub range: DateRange,
    /// The promotion being edited, so it does not conflict with itself.
    pub exclude_id: Option<PromotionId>,
}

impl ConflictCheck {
    pub fn new(
        team_id: impl Into<TeamId>,
        channel_id: impl Into<ChannelId>,
        range: DateRange,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            channel_id: channel_id.into(),
            range,
            exclude_id: None,
        }
    }

    pub fn excluding(mut self, id: impl Into<PromotionId>) -> Self {
        self.exclude_id = Some(id.into());
        self
    }

    /// The check a promotion's own schedule implies, excluding itself.
    pub fn for_promotion(promotion: &Promotion) -> Self {
        Self {
            team_id: promotion.team_id.clone(),
            channel_id: promotion.channel_id.clone(),
            range: promotion.range,
            exclude_id: Some(promotion.id.clone()),
        }
    }

    fn collides_with(&self, other: &Promotion) -> bool {
        other.team_id == self.team_id
            && other.channel_id == self.channel_id
            && !other.is_cancelled()
            && self.exclude_id.as_ref() != Some(&other.id)
            && other.range.overlaps(&self.range)
    }
}

/// Outcome of a conflict check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport<'a> {
    pub has_conflict: bool,
    /// Conflicting promotions in ascending start-date order.
    pub conflicts: Vec<&'a Promotion>,
}

impl ConflictReport<'_> {
    pub fn conflict_ids(&self) -> Vec<PromotionId> {
        self.conflicts.iter().map(|p| p.id.clone()).collect()
    }
}

/// Find existing promotions that collide with a candidate schedule.
pub fn check_conflicts<'a>(
    promotions: &'a [Promotion],
    check: &ConflictCheck,
) -> ConflictReport<'a> {
    let mut conflicts: Vec<&Promotion> = promotions
        .iter()
        .filter(|p| check.collides_with(p))
        .collect();
    conflicts.sort_by_key(|p| p.start());

    debug!(
        team = %check.team_id,
        channel = %check.channel_id,
        range = %check.range,
        conflicts = conflicts.len(),
        "conflict check"
    );

    ConflictReport {
        has_conflict: !conflicts.is_empty(),
        conflicts,
    }
}

/// A pair of conflicting promotions found by [`find_channel_conflicts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictPair<'a> {
    pub first: &'a Promotion,
    pub second: &'a Promotion,
    /// The days both promotions run.
    pub overlap: DateRange,
    pub overlap_days: i64,
}

/// Find every conflicting pair among a team's promotions.
///
/// Each pair is reported once as `(earlier, later)` by input position.
pub fn find_channel_conflicts<'a>(
    promotions: &'a [Promotion],
    team_id: &TeamId,
) -> Vec<ConflictPair<'a>> {
    let candidates: Vec<&Promotion> = promotions
        .iter()
        .filter(|p| &p.team_id == team_id && !p.is_cancelled())
        .collect();

    let mut pairs = Vec::new();

    for (i, &first) in candidates.iter().enumerate() {
        for &second in candidates.iter().skip(i + 1) {
            if first.channel_id != second.channel_id {
                continue;
            }
            if let Some(overlap) = first.range.intersection(&second.range) {
                pairs.push(ConflictPair {
                    first,
                    second,
                    overlap,
                    overlap_days: overlap.num_days(),
                });
            }
        }
    }

    debug!(team = %team_id, pairs = pairs.len(), "calendar conflict audit");

    pairs
}
