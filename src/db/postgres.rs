// SPDX-License-Identifier: MIT

//! Postgres client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (league state, group membership)
//! - Leaderboard groups (weekly cohorts)
//! - Problem solutions (the append-only solve-event log)

use crate::error::AppError;
use crate::models::{LeaderboardGroup, ProblemSolution, Profile, GROUP_SIZE_LIMIT, STATUS_SOLVED};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;

const MAX_CONNECTIONS: u32 = 10;

/// Postgres database client.
#[derive(Clone)]
pub struct Db {
    pool: Option<PgPool>,
}

impl Db {
    /// Connect to Postgres and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Postgres: {}", e)))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        tracing::info!("Connected to Postgres");

        Ok(Self { pool: Some(pool) })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { pool: None }
    }

    /// Get the pool, or an error if offline.
    pub fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by user id.
    pub async fn get_profile(&self, user_id: i64) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT user_id, display_name, avatar_url, league, current_group_id, created_at
             FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool()?)
        .await?;
        Ok(profile)
    }

    /// Get a profile, creating a fresh Bronze one if it doesn't exist.
    ///
    /// A data-modifying CTE and its outer SELECT share one snapshot, so an
    /// `INSERT ... ON CONFLICT DO NOTHING` CTE followed by a SELECT misses
    /// the row it just inserted. The no-op DO UPDATE makes the single
    /// statement return the row on both the insert and the conflict path.
    pub async fn get_or_create_profile(
        &self,
        user_id: i64,
        display_name: &str,
    ) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (user_id, display_name)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET display_name = profiles.display_name
             RETURNING user_id, display_name, avatar_url, league, current_group_id, created_at",
        )
        .bind(user_id)
        .bind(display_name)
        .fetch_one(self.pool()?)
        .await?;
        Ok(profile)
    }

    // ─── Group Operations ────────────────────────────────────────

    /// Get a group by id.
    pub async fn get_group(&self, group_id: i64) -> Result<Option<LeaderboardGroup>, AppError> {
        let group = sqlx::query_as::<_, LeaderboardGroup>(
            "SELECT id, league, week_start_date, processed_at
             FROM leaderboard_groups WHERE id = $1",
        )
        .bind(group_id)
        .fetch_optional(self.pool()?)
        .await?;
        Ok(group)
    }

    /// Members currently assigned to a group, ordered by user id.
    pub async fn group_members(&self, group_id: i64) -> Result<Vec<Profile>, AppError> {
        let members = sqlx::query_as::<_, Profile>(
            "SELECT user_id, display_name, avatar_url, league, current_group_id, created_at
             FROM profiles WHERE current_group_id = $1 ORDER BY user_id",
        )
        .bind(group_id)
        .fetch_all(self.pool()?)
        .await?;
        Ok(members)
    }

    /// Groups for a given week that the rollover engine has not consumed yet.
    pub async fn unprocessed_groups(
        &self,
        week_start: DateTime<Utc>,
    ) -> Result<Vec<LeaderboardGroup>, AppError> {
        let groups = sqlx::query_as::<_, LeaderboardGroup>(
            "SELECT id, league, week_start_date, processed_at
             FROM leaderboard_groups
             WHERE week_start_date = $1 AND processed_at IS NULL
             ORDER BY id",
        )
        .bind(week_start)
        .fetch_all(self.pool()?)
        .await?;
        Ok(groups)
    }

    /// Find a live group of the given league with room for one more member.
    ///
    /// The count check here and the later [`assign_to_group`] are separate
    /// statements, so two users joining at the same instant can both see the
    /// same open slot and land in the same group. The cap is a cohort-size
    /// target, not a hard constraint, and an eleventh member does not break
    /// scoring or rollover.
    ///
    /// [`assign_to_group`]: Db::assign_to_group
    pub async fn find_open_group(
        &self,
        league: &str,
        week_start: DateTime<Utc>,
    ) -> Result<Option<i64>, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT g.id
             FROM leaderboard_groups g
             LEFT JOIN profiles p ON p.current_group_id = g.id
             WHERE g.league = $1 AND g.week_start_date = $2 AND g.processed_at IS NULL
             GROUP BY g.id
             HAVING COUNT(p.user_id) < $3
             ORDER BY g.id
             LIMIT 1",
        )
        .bind(league)
        .bind(week_start)
        .bind(GROUP_SIZE_LIMIT)
        .fetch_optional(self.pool()?)
        .await?;
        Ok(id)
    }

    /// Create a new group for a league and week.
    pub async fn create_group(
        &self,
        league: &str,
        week_start: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO leaderboard_groups (league, week_start_date)
             VALUES ($1, $2) RETURNING id",
        )
        .bind(league)
        .bind(week_start)
        .fetch_one(self.pool()?)
        .await?;
        Ok(id)
    }

    /// Point a profile at its group for the current week.
    pub async fn assign_to_group(&self, user_id: i64, group_id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE profiles SET current_group_id = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(group_id)
            .execute(self.pool()?)
            .await?;
        Ok(())
    }

    /// Apply one group's rollover atomically: stamp the idempotency marker,
    /// move promoted/demoted members, and detach everyone from the group.
    ///
    /// Returns false without touching anything if another run already stamped
    /// the group (the WHERE on `processed_at IS NULL` is the run-once guard).
    pub async fn finalize_group(
        &self,
        group_id: i64,
        promoted: &[i64],
        promote_to: &str,
        demoted: &[i64],
        demote_to: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool()?.begin().await?;

        let stamped = sqlx::query(
            "UPDATE leaderboard_groups SET processed_at = $2
             WHERE id = $1 AND processed_at IS NULL",
        )
        .bind(group_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if stamped == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if !promoted.is_empty() {
            sqlx::query("UPDATE profiles SET league = $2 WHERE user_id = ANY($1)")
                .bind(promoted)
                .bind(promote_to)
                .execute(&mut *tx)
                .await?;
        }

        if !demoted.is_empty() {
            sqlx::query("UPDATE profiles SET league = $2 WHERE user_id = ANY($1)")
                .bind(demoted)
                .bind(demote_to)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE profiles SET current_group_id = NULL WHERE current_group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    // ─── Solve-Event Operations ──────────────────────────────────

    /// Record a first solve. Returns false if the user already solved this
    /// problem; the existing row's `first_solved_at` and `xp_earned` are
    /// never updated.
    pub async fn record_solve(
        &self,
        user_id: i64,
        problem_id: i64,
        xp_earned: i64,
        solved_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let inserted = sqlx::query(
            "INSERT INTO problem_solutions (user_id, problem_id, status, first_solved_at, xp_earned)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, problem_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(problem_id)
        .bind(STATUS_SOLVED)
        .bind(solved_at)
        .bind(xp_earned)
        .execute(self.pool()?)
        .await?
        .rows_affected();
        Ok(inserted > 0)
    }

    /// Get a user's record for one problem, if they have one.
    pub async fn get_solution(
        &self,
        user_id: i64,
        problem_id: i64,
    ) -> Result<Option<ProblemSolution>, AppError> {
        let solution = sqlx::query_as::<_, ProblemSolution>(
            "SELECT user_id, problem_id, status, first_solved_at, xp_earned
             FROM problem_solutions WHERE user_id = $1 AND problem_id = $2",
        )
        .bind(user_id)
        .bind(problem_id)
        .fetch_optional(self.pool()?)
        .await?;
        Ok(solution)
    }

    /// Sum of XP a user earned from first solves inside [start, end).
    pub async fn weekly_score(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let score = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(xp_earned), 0)::BIGINT
             FROM problem_solutions
             WHERE user_id = $1 AND status = $2
               AND first_solved_at >= $3 AND first_solved_at < $4",
        )
        .bind(user_id)
        .bind(STATUS_SOLVED)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool()?)
        .await?;
        Ok(score)
    }

    /// Weekly XP for a whole cohort in one query. Users with no qualifying
    /// solves map to 0, never missing.
    pub async fn weekly_scores(
        &self,
        user_ids: &[i64],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<i64, i64>, AppError> {
        let mut scores: HashMap<i64, i64> = user_ids.iter().map(|&id| (id, 0)).collect();

        if user_ids.is_empty() {
            return Ok(scores);
        }

        let rows = sqlx::query_as::<_, (i64, i64)>(
            "SELECT user_id, COALESCE(SUM(xp_earned), 0)::BIGINT
             FROM problem_solutions
             WHERE user_id = ANY($1) AND status = $2
               AND first_solved_at >= $3 AND first_solved_at < $4
             GROUP BY user_id",
        )
        .bind(user_ids)
        .bind(STATUS_SOLVED)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool()?)
        .await?;

        for (user_id, score) in rows {
            scores.insert(user_id, score);
        }
        Ok(scores)
    }
}
