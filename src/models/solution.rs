//! Solve-event model: the append-only log weekly scores are computed from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage value for a successful solve. The external judge only reports
/// passes to this service, so no other status is written here.
pub const STATUS_SOLVED: &str = "solved";

/// A user's record for one problem. At most one row per (user_id, problem_id).
///
/// `first_solved_at` and `xp_earned` are frozen at first-solve time: a
/// re-solve never updates them, and a later change to the problem's difficulty
/// never recomputes the credited XP.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProblemSolution {
    pub user_id: i64,
    pub problem_id: i64,
    pub status: String,
    pub first_solved_at: DateTime<Utc>,
    pub xp_earned: i64,
}
