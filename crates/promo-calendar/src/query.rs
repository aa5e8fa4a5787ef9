//! Team-scoped range queries over a promotion list.
//!
//! Returns every promotion of the team whose days intersect the window,
//! optionally narrowed to a set of channels and/or statuses. Results are sorted
//! by start date with a stable sort, so promotions sharing a start date keep
//! the order they had in the input and repeated calls give identical output.

use std::collections::HashSet;

use tracing::debug;

use crate::interval::DateRange;
use crate::promotion::{ChannelId, Promotion, PromotionStatus, TeamId};

/// Parameters of a range query.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub team_id: TeamId,
    pub window: DateRange,
    /// `None` matches every channel.
    pub channel_ids: Option<HashSet<ChannelId>>,
    /// `None` matches every status, including `cancelled`.
    pub statuses: Option<HashSet<PromotionStatus>>,
}

impl RangeQuery {
    pub fn new(team_id: impl Into<TeamId>, window: DateRange) -> Self {
        Self {
            team_id: team_id.into(),
            window,
            channel_ids: None,
            statuses: None,
        }
    }

    /// Restrict to the given channels. An empty iterator leaves the filter unset.
    pub fn with_channels<I, C>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ChannelId>,
    {
        let set: HashSet<ChannelId> = channels.into_iter().map(Into::into).collect();
        self.channel_ids = if set.is_empty() { None } else { Some(set) };
        self
    }

    /// Restrict to the given statuses. An empty iterator leaves the filter unset.
    pub fn with_statuses<I>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = PromotionStatus>,
    {
        let set: HashSet<PromotionStatus> = statuses.into_iter().collect();
        self.statuses = if set.is_empty() { None } else { Some(set) };
        self
    }

    /// Whether a single promotion satisfies every condition of the query.
    pub fn matches(&self, promotion: &Promotion) -> bool {
        promotion.team_id == self.team_id
            && promotion.range.overlaps(&self.window)
            && self
                .channel_ids
                .as_ref()
                .is_none_or(|channels| channels.contains(&promotion.channel_id))
            && self
                .statuses
                .as_ref()
                .is_none_or(|statuses| statuses.contains(&promotion.status))
    }
}

/// Run a range query, returning matches in ascending start-date order.
pub fn range_query<'a>(promotions: &'a [Promotion], query: &RangeQuery) -> Vec<&'a Promotion> {
    let mut matched: Vec<&Promotion> = promotions.iter().filter(|p| query.matches(p)).collect();

    // `sort_by_key` is stable: equal start dates keep input order.
    matched.sort_by_key(|p| p.start());

    debug!(
        team = %query.team_id,
        window = %query.window,
        scanned = promotions.len(),
        matched = matched.len(),
        "range query"
    );

    matched
}
