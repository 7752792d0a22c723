// SPDX-License-Identifier: MIT

//! Weekly group assignment.
//!
//! A user joins a leaderboard group the first time they earn a score in a
//! week and have no current group. Assignment picks the oldest live group of
//! the user's league with room left, or opens a new one. Users still attached
//! to a stale group are left alone: the rollover engine owns detaching them,
//! and reassigning early would pull them out of a group it has not processed
//! yet.

use crate::db::Db;
use crate::error::Result;
use crate::models::{League, Profile};
use crate::week;
use chrono::{DateTime, Utc};

/// Ensure the user has a group for the current week. Returns the group id the
/// profile points at afterwards, or None when no assignment was made.
pub async fn ensure_group_assignment(
    db: &Db,
    profile: &Profile,
    now: DateTime<Utc>,
) -> Result<Option<i64>> {
    if let Some(group_id) = profile.current_group_id {
        return Ok(Some(group_id));
    }

    let league: League = profile.league.parse()?;
    let current_week = week::week_start(now);

    let group_id = match db.find_open_group(league.as_str(), current_week).await? {
        Some(id) => id,
        None => db.create_group(league.as_str(), current_week).await?,
    };

    db.assign_to_group(profile.user_id, group_id).await?;

    tracing::info!(
        user_id = profile.user_id,
        group_id,
        league = %league,
        "Assigned user to leaderboard group"
    );
    Ok(Some(group_id))
}
