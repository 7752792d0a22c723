// SPDX-License-Identifier: MIT

//! Weekly score aggregation and ranking.
//!
//! Scores are computed from the solve-event log for a bounded window
//! [week_start, week_end): both bounds are enforced so a solve recorded in a
//! later week can never leak into a stale read.

use crate::db::Db;
use crate::error::AppError;
use crate::models::Profile;
use crate::week;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Read-side score queries over the solve-event log.
#[derive(Clone)]
pub struct ScoreService {
    db: Db,
}

impl ScoreService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// One user's XP for the week starting at `week_start`. 0 when the user
    /// has no qualifying solves.
    pub async fn weekly_score(
        &self,
        user_id: i64,
        week_start: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        self.db
            .weekly_score(user_id, week_start, week::week_end(week_start))
            .await
    }

    /// XP for a whole cohort in one query; the rollover engine scores entire
    /// groups through this to avoid N+1 lookups.
    pub async fn weekly_scores(
        &self,
        user_ids: &[i64],
        week_start: DateTime<Utc>,
    ) -> Result<HashMap<i64, i64>, AppError> {
        self.db
            .weekly_scores(user_ids, week_start, week::week_end(week_start))
            .await
    }
}

/// A group member with their weekly XP, as ranked for display or rollover.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMember {
    pub user_id: i64,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub weekly_xp: i64,
}

/// Rank a cohort: descending by weekly XP, ties broken by ascending user id.
///
/// The rollover engine and the leaderboard read path share this comparator so
/// the ranking a user sees matches the ranking their promotion was decided by.
pub fn rank_members(members: &[Profile], scores: &HashMap<i64, i64>) -> Vec<RankedMember> {
    let mut ranked: Vec<RankedMember> = members
        .iter()
        .map(|m| RankedMember {
            user_id: m.user_id,
            display_name: m.display_name.clone(),
            avatar_url: m.avatar_url.clone(),
            weekly_xp: scores.get(&m.user_id).copied().unwrap_or(0),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.weekly_xp
            .cmp(&a.weekly_xp)
            .then(a.user_id.cmp(&b.user_id))
    });
    ranked
}
