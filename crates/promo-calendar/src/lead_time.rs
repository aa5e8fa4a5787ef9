//! Channel lead times: how early promotion paperwork must start.
//!
//! Each Korean e-commerce channel needs creative assets, a submission and an
//! approval round before a promotion can go live. Working backwards from the
//! promotion start date gives the milestone deadlines for each channel.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::promotion::ChannelId;

/// Days the channel usually takes for approval, counted before the start date.
const EXPECTED_APPROVAL_DAYS_BEFORE_START: u64 = 2;

/// Lead-time profile for a single channel, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTimeProfile {
    pub creative_days: u32,
    pub submission_days: u32,
    pub approval_days: u32,
}

impl LeadTimeProfile {
    pub const fn new(creative_days: u32, submission_days: u32, approval_days: u32) -> Self {
        Self {
            creative_days,
            submission_days,
            approval_days,
        }
    }

    /// Sum of all three phases, computed in `u64` so it cannot overflow.
    pub fn total_days(&self) -> u64 {
        u64::from(self.creative_days) + self.after_creative_days()
    }

    /// Days between the creative deadline and the start date.
    fn after_creative_days(&self) -> u64 {
        u64::from(self.submission_days) + u64::from(self.approval_days)
    }
}

/// Milestone deadlines for one channel and start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadTimePlan {
    pub channel_id: ChannelId,
    pub total_lead_days: u64,
    /// Last day on which preparation can begin.
    pub latest_start_date: NaiveDate,
    pub creative_due: NaiveDate,
    pub submission_due: NaiveDate,
    pub expected_approval: NaiveDate,
}

/// Lead-time profiles keyed by channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadTimeTable {
    profiles: BTreeMap<ChannelId, LeadTimeProfile>,
}

impl Default for LeadTimeTable {
    /// Profiles for the four major channels.
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("oliveyoung", LeadTimeProfile::new(14, 21, 7));
        table.insert("coupang", LeadTimeProfile::new(10, 14, 5));
        table.insert("naver", LeadTimeProfile::new(10, 14, 5));
        table.insert("kakao", LeadTimeProfile::new(7, 10, 3));
        table
    }
}

impl LeadTimeTable {
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Add or replace a channel's profile.
    pub fn insert(&mut self, channel: impl Into<ChannelId>, profile: LeadTimeProfile) {
        self.profiles.insert(channel.into(), profile);
    }

    /// Overlay `overrides` on this table; overridden channels take the new profile.
    pub fn merged_with(mut self, overrides: &LeadTimeTable) -> Self {
        for (channel, profile) in &overrides.profiles {
            self.profiles.insert(channel.clone(), *profile);
        }
        self
    }

    pub fn get(&self, channel: &ChannelId) -> Option<&LeadTimeProfile> {
        self.profiles.get(channel)
    }

    pub fn channels(&self) -> impl Iterator<Item = &ChannelId> {
        self.profiles.keys()
    }

    /// Milestones for a promotion on `channel` starting on `start`.
    ///
    /// Returns `None` when the channel has no profile, or when a deadline
    /// would fall before the earliest representable date.
    pub fn plan(&self, channel: &ChannelId, start: NaiveDate) -> Option<LeadTimePlan> {
        let profile = self.get(channel)?;
        let before = |days: u64| start.checked_sub_days(Days::new(days));

        Some(LeadTimePlan {
            channel_id: channel.clone(),
            total_lead_days: profile.total_days(),
            latest_start_date: before(profile.total_days())?,
            creative_due: before(profile.after_creative_days())?,
            submission_due: before(u64::from(profile.approval_days))?,
            expected_approval: before(EXPECTED_APPROVAL_DAYS_BEFORE_START)?,
        })
    }

    /// Plans for each known channel, in the order given. Unknown channels are skipped.
    pub fn plan_all<'c, I>(&self, channels: I, start: NaiveDate) -> Vec<LeadTimePlan>
    where
        I: IntoIterator<Item = &'c ChannelId>,
    {
        channels
            .into_iter()
            .filter_map(|channel| self.plan(channel, start))
            .collect()
    }
}
