// SPDX-License-Identifier: MIT

//! Weekly rollover engine: promotion and demotion across the league
//! hierarchy.
//!
//! Runs once per scoring-period rollover (an external scheduler hits
//! `/rollover/run`). For every unprocessed group of the week that just ended:
//! rank members by weekly XP, promote the top of the table, demote the
//! bottom, detach everyone from the retired group, and stamp the group's
//! `processed_at` marker — all inside one per-group transaction. There is no
//! cross-group transaction; a failure in one group is logged and the loop
//! moves on.

use crate::db::Db;
use crate::error::Result;
use crate::models::{LeaderboardGroup, League};
use crate::services::scores::{rank_members, ScoreService};
use crate::week;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Zone sizes for one rollover.
#[derive(Debug, Clone, Copy)]
pub struct RolloverConfig {
    /// Top-of-table slots that move one league up
    pub promotion_count: usize,
    /// Bottom-of-table slots that move one league down
    pub demotion_count: usize,
}

impl Default for RolloverConfig {
    fn default() -> Self {
        Self {
            promotion_count: 10,
            demotion_count: 5,
        }
    }
}

/// Summary of one engine invocation.
#[derive(Debug, Default, Serialize)]
pub struct RolloverReport {
    pub groups_processed: u32,
    pub groups_failed: u32,
    pub promoted: u32,
    pub demoted: u32,
}

/// The promotion/demotion batch engine.
pub struct RolloverEngine {
    db: Db,
    scores: ScoreService,
    config: RolloverConfig,
}

impl RolloverEngine {
    pub fn new(db: Db, config: RolloverConfig) -> Self {
        let scores = ScoreService::new(db.clone());
        Self { db, scores, config }
    }

    /// Process every group whose scoring week just ended.
    ///
    /// Idempotent: groups carry a `processed_at` marker stamped in the same
    /// transaction as their league updates, so invoking this twice for the
    /// same week finds nothing left to do.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RolloverReport> {
        let prev_week = week::previous_week_start(now);
        let groups = self.db.unprocessed_groups(prev_week).await?;

        tracing::info!(
            week_start = %prev_week,
            group_count = groups.len(),
            "Starting league rollover"
        );

        let mut report = RolloverReport::default();
        for group in groups {
            match self.process_group(&group, prev_week, now).await {
                Ok(Some((promoted, demoted))) => {
                    report.groups_processed += 1;
                    report.promoted += promoted;
                    report.demoted += demoted;
                }
                // Another invocation stamped the group first; nothing applied.
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        group_id = group.id,
                        league = %group.league,
                        error = %e,
                        "Failed to process group, continuing with next"
                    );
                    report.groups_failed += 1;
                }
            }
        }

        tracing::info!(
            groups_processed = report.groups_processed,
            groups_failed = report.groups_failed,
            promoted = report.promoted,
            demoted = report.demoted,
            "League rollover complete"
        );
        Ok(report)
    }

    /// Rank one group and apply its promotions and demotions atomically.
    async fn process_group(
        &self,
        group: &LeaderboardGroup,
        prev_week: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<(u32, u32)>> {
        let league: League = group.league.parse()?;

        let members = self.db.group_members(group.id).await?;
        if members.is_empty() {
            // Everyone already detached; just retire the group.
            self.db
                .finalize_group(group.id, &[], league.as_str(), &[], league.as_str(), now)
                .await?;
            return Ok(Some((0, 0)));
        }

        let member_ids: Vec<i64> = members.iter().map(|m| m.user_id).collect();
        let scores = self.scores.weekly_scores(&member_ids, prev_week).await?;
        let ranked = rank_members(&members, &scores);

        let (promote_len, demote_len) = zone_sizes(ranked.len(), self.config);
        let promoted: Vec<i64> = ranked[..promote_len].iter().map(|r| r.user_id).collect();
        let demoted: Vec<i64> = ranked[ranked.len() - demote_len..]
            .iter()
            .map(|r| r.user_id)
            .collect();

        let applied = self
            .db
            .finalize_group(
                group.id,
                &promoted,
                league.next().as_str(),
                &demoted,
                league.previous().as_str(),
                now,
            )
            .await?;

        if !applied {
            tracing::warn!(group_id = group.id, "Group already processed, skipping");
            return Ok(None);
        }

        tracing::info!(
            group_id = group.id,
            league = %league,
            promoted = promoted.len(),
            demoted = demoted.len(),
            members = ranked.len(),
            "Group rollover applied"
        );
        Ok(Some((promoted.len() as u32, demoted.len() as u32)))
    }
}

/// Promotion and demotion zone sizes for a cohort.
///
/// Promotion takes precedence when the cohort is smaller than the two zones
/// combined: the promotion zone is clamped to the member count first, and the
/// demotion zone only draws from members left outside it. A member is never
/// in both zones, and a cohort no larger than the promotion zone demotes
/// nobody.
fn zone_sizes(member_count: usize, config: RolloverConfig) -> (usize, usize) {
    let promote = member_count.min(config.promotion_count);
    let demote = config.demotion_count.min(member_count - promote);
    (promote, demote)
}
