//! User profile model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user profile row. The account identity itself lives with the external
/// auth provider; this row carries the league state the rollover engine
/// mutates.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// User id issued by the auth provider
    pub user_id: i64,
    /// Display name shown on leaderboards
    pub display_name: String,
    /// Avatar URL (may be None if not set)
    pub avatar_url: Option<String>,
    /// Current league tier (storage form; parse via `League::from_str`)
    pub league: String,
    /// Active leaderboard group, if assigned this week
    pub current_group_id: Option<i64>,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
}
