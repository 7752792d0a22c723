//! Leaderboard group model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One league cohort competing for one scoring week.
///
/// A group is live only while `week_start_date` equals the current canonical
/// week start; after that it is stale and must not be ranked. `processed_at`
/// is the idempotency marker: the rollover engine only picks up groups where
/// it is NULL and stamps it inside the same transaction that applies the
/// league changes, so a duplicate trigger finds nothing to do.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaderboardGroup {
    pub id: i64,
    /// League tier of every member at assignment time (storage form)
    pub league: String,
    /// Canonical week-start timestamp; the group's temporal key
    pub week_start_date: DateTime<Utc>,
    /// Set when the rollover engine has consumed this group
    pub processed_at: Option<DateTime<Utc>>,
}

/// Cohort size cap applied when assigning users into groups.
pub const GROUP_SIZE_LIMIT: i64 = 10;
