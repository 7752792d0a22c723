// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::membership::ensure_group_assignment;
use crate::services::LeaderboardView;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/solve", post(record_solve))
}

// ─── Leaderboard ─────────────────────────────────────────────

/// One row of the weekly leaderboard.
#[derive(Serialize)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub name: String,
    pub avatar_url: Option<String>,
    #[serde(rename = "weeklyXP")]
    pub weekly_xp: i64,
}

/// Leaderboard for a user with a live group this week.
#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub league: String,
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(rename = "currentUserRank")]
    pub current_user_rank: i64,
}

/// Returned when the user has no live group this week.
#[derive(Serialize)]
pub struct NoLeagueResponse {
    pub message: String,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Get the current user's weekly leaderboard.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response> {
    let view = state
        .leaderboard_service
        .get_leaderboard(user.user_id, chrono::Utc::now())
        .await?;

    match view {
        LeaderboardView::NotInLeague => Ok(Json(NoLeagueResponse {
            message: "You are not in a league this week. Solve a problem to join one!".to_string(),
            leaderboard: vec![],
        })
        .into_response()),
        LeaderboardView::Current {
            league,
            entries,
            current_user_rank,
        } => {
            let leaderboard = entries
                .into_iter()
                .map(|e| LeaderboardEntry {
                    id: e.user_id,
                    name: e.display_name,
                    avatar_url: e.avatar_url,
                    weekly_xp: e.weekly_xp,
                })
                .collect();

            Ok(Json(LeaderboardResponse {
                league: league.to_string(),
                leaderboard,
                current_user_rank,
            })
            .into_response())
        }
    }
}

// ─── Solve Events ────────────────────────────────────────────

#[derive(Deserialize)]
struct SolveRequest {
    problem_id: i64,
    /// XP value for this problem, as resolved by the problem catalog.
    xp: i64,
}

/// Response for a recorded solve.
#[derive(Serialize)]
pub struct SolveResponse {
    /// Whether this was the user's first solve of the problem
    pub first_solve: bool,
    /// XP credited (0 on a re-solve)
    pub xp_awarded: i64,
    /// Group the user competes in this week, if assigned
    pub group_id: Option<i64>,
}

/// Record a solved problem and make sure the user is in this week's group.
///
/// A re-solve is a no-op for scoring: the stored `first_solved_at` and
/// `xp_earned` stay frozen.
async fn record_solve(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SolveRequest>,
) -> Result<Json<SolveResponse>> {
    if req.xp < 0 {
        return Err(crate::error::AppError::BadRequest(
            "XP must not be negative".to_string(),
        ));
    }

    let now = chrono::Utc::now();
    let default_name = format!("user-{}", user.user_id);
    let profile = state
        .db
        .get_or_create_profile(user.user_id, &default_name)
        .await?;

    let first_solve = state
        .db
        .record_solve(user.user_id, req.problem_id, req.xp, now)
        .await?;

    tracing::debug!(
        user_id = user.user_id,
        problem_id = req.problem_id,
        first_solve,
        "Solve recorded"
    );

    // First score of the week with no group: join one now so the solve
    // counts on a leaderboard.
    let group_id = if first_solve {
        ensure_group_assignment(&state.db, &profile, now).await?
    } else {
        profile.current_group_id
    };

    Ok(Json(SolveResponse {
        first_solve,
        xp_awarded: if first_solve { req.xp } else { 0 },
        group_id,
    }))
}
