// SPDX-License-Identifier: MIT

//! On-demand leaderboard reconstruction for a user's current group.
//!
//! Read-only; must agree with the rollover engine on which week is current,
//! so all week math goes through [`crate::week`] and ranking goes through the
//! shared comparator in [`crate::services::scores`].

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::League;
use crate::services::scores::{rank_members, RankedMember, ScoreService};
use crate::week;
use chrono::{DateTime, Utc};

/// Result of a leaderboard lookup.
#[derive(Debug)]
pub enum LeaderboardView {
    /// No group this week: never assigned, or the group is stale (its week
    /// already ended). Not an error.
    NotInLeague,
    /// Live group ranking for the current week.
    Current {
        league: League,
        entries: Vec<RankedMember>,
        /// 1-based rank of the requesting user; -1 if they are somehow
        /// absent from the member list.
        current_user_rank: i64,
    },
}

/// Read path for the weekly leaderboard.
#[derive(Clone)]
pub struct LeaderboardService {
    db: Db,
    scores: ScoreService,
}

impl LeaderboardService {
    pub fn new(db: Db) -> Self {
        let scores = ScoreService::new(db.clone());
        Self { db, scores }
    }

    /// Reconstruct the requesting user's current group ranking.
    pub async fn get_leaderboard(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<LeaderboardView> {
        let profile = self
            .db
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let Some(group_id) = profile.current_group_id else {
            return Ok(LeaderboardView::NotInLeague);
        };

        let group = self
            .db
            .get_group(group_id)
            .await?
            .ok_or_else(|| AppError::Data(format!("Dangling group reference: {}", group_id)))?;

        // Stale group from a prior week: same staleness test the engine uses.
        let current_week = week::week_start(now);
        if group.week_start_date != current_week {
            tracing::debug!(
                user_id,
                group_id,
                group_week = %group.week_start_date,
                "Group is stale, returning empty leaderboard"
            );
            return Ok(LeaderboardView::NotInLeague);
        }

        let league: League = group.league.parse()?;

        let members = self.db.group_members(group_id).await?;
        let member_ids: Vec<i64> = members.iter().map(|m| m.user_id).collect();
        let scores = self.scores.weekly_scores(&member_ids, current_week).await?;
        let entries = rank_members(&members, &scores);

        let current_user_rank = entries
            .iter()
            .position(|e| e.user_id == user_id)
            .map(|i| i as i64 + 1)
            .unwrap_or(-1);

        Ok(LeaderboardView::Current {
            league,
            entries,
            current_user_rank,
        })
    }
}
