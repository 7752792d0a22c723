// SPDX-License-Identifier: MIT

//! Integration tests for the leaderboard read path and score aggregation.
//!
//! Require a real Postgres via DATABASE_URL; skipped otherwise.

use chrono::{Duration, TimeZone, Utc};
use codeleague::models::STATUS_SOLVED;
use codeleague::services::membership::ensure_group_assignment;
use codeleague::services::{LeaderboardService, LeaderboardView, ScoreService};
use codeleague::week;

mod common;

#[tokio::test]
async fn test_first_time_user_gets_bronze_profile() {
    require_database!();
    let db = common::test_db().await;

    let ids = common::unique_user_ids(1);

    // The very first call must both create and return the row
    let profile = db.get_or_create_profile(ids[0], "newcomer").await.unwrap();
    assert_eq!(profile.user_id, ids[0]);
    assert_eq!(profile.display_name, "newcomer");
    assert_eq!(profile.league, "bronze");
    assert!(profile.current_group_id.is_none());

    // A repeat call keeps the stored name instead of overwriting it
    let again = db.get_or_create_profile(ids[0], "impostor").await.unwrap();
    assert_eq!(again.display_name, "newcomer");
    assert_eq!(again.created_at, profile.created_at);
}

#[tokio::test]
async fn test_no_group_means_no_league_this_week() {
    require_database!();
    let db = common::test_db().await;

    let ids = common::unique_user_ids(1);
    db.get_or_create_profile(ids[0], "loner").await.unwrap();

    let view = LeaderboardService::new(db.clone())
        .get_leaderboard(ids[0], Utc::now())
        .await
        .expect("read leaderboard");

    assert!(matches!(view, LeaderboardView::NotInLeague));
}

#[tokio::test]
async fn test_stale_group_means_no_league_this_week() {
    require_database!();
    let db = common::test_db().await;

    let now = Utc.with_ymd_and_hms(2022, 2, 18, 10, 0, 0).unwrap();
    let last_week = week::previous_week_start(now);

    let ids = common::unique_user_ids(1);
    db.get_or_create_profile(ids[0], "late-reader").await.unwrap();
    let group_id = db.create_group("bronze", last_week).await.unwrap();
    db.assign_to_group(ids[0], group_id).await.unwrap();
    // Scores exist, but the group's week already ended
    db.record_solve(ids[0], 3000, 40, last_week + Duration::hours(1))
        .await
        .unwrap();

    let view = LeaderboardService::new(db.clone())
        .get_leaderboard(ids[0], now)
        .await
        .expect("read leaderboard");

    assert!(matches!(view, LeaderboardView::NotInLeague));
}

#[tokio::test]
async fn test_live_group_ranking_matches_scores() {
    require_database!();
    let db = common::test_db().await;

    let now = Utc.with_ymd_and_hms(2022, 3, 17, 14, 0, 0).unwrap();
    let this_week = week::week_start(now);

    let ids = common::unique_user_ids(3);
    let group_id = db.create_group("silver", this_week).await.unwrap();
    for (i, &id) in ids.iter().enumerate() {
        db.get_or_create_profile(id, &format!("user-{id}")).await.unwrap();
        db.assign_to_group(id, group_id).await.unwrap();
        // 10, 20, 30 XP in user-id order
        db.record_solve(id, 3100 + i as i64, (i as i64 + 1) * 10, now - Duration::hours(1))
            .await
            .unwrap();
    }

    let view = LeaderboardService::new(db.clone())
        .get_leaderboard(ids[0], now)
        .await
        .expect("read leaderboard");

    match view {
        LeaderboardView::Current {
            league,
            entries,
            current_user_rank,
        } => {
            assert_eq!(league.as_str(), "silver");
            let order: Vec<i64> = entries.iter().map(|e| e.user_id).collect();
            assert_eq!(order, vec![ids[2], ids[1], ids[0]]);
            assert_eq!(entries[0].weekly_xp, 30);
            // Requesting user scored least: rank 3 of 3
            assert_eq!(current_user_rank, 3);
        }
        other => panic!("Expected a live leaderboard, got {:?}", other),
    }
}

#[tokio::test]
async fn test_weekly_score_is_zero_without_solves() {
    require_database!();
    let db = common::test_db().await;

    let ids = common::unique_user_ids(1);
    db.get_or_create_profile(ids[0], "idle").await.unwrap();

    let score = ScoreService::new(db.clone())
        .weekly_score(ids[0], week::week_start(Utc::now()))
        .await
        .expect("weekly score");

    assert_eq!(score, 0);
}

#[tokio::test]
async fn test_resolve_never_changes_the_first_solve() {
    require_database!();
    let db = common::test_db().await;

    let now = Utc.with_ymd_and_hms(2022, 4, 14, 9, 0, 0).unwrap();
    let this_week = week::week_start(now);

    let ids = common::unique_user_ids(1);
    db.get_or_create_profile(ids[0], "grinder").await.unwrap();

    let first = db.record_solve(ids[0], 3200, 50, now).await.unwrap();
    assert!(first);

    // Re-solve with a different XP value later in the week: rejected
    let second = db
        .record_solve(ids[0], 3200, 80, now + Duration::hours(5))
        .await
        .unwrap();
    assert!(!second);

    let score = ScoreService::new(db.clone())
        .weekly_score(ids[0], this_week)
        .await
        .unwrap();
    assert_eq!(score, 50);

    // The stored row still carries the original solve, not the retry
    let solution = db
        .get_solution(ids[0], 3200)
        .await
        .unwrap()
        .expect("solution row");
    assert_eq!(solution.status, STATUS_SOLVED);
    assert_eq!(solution.xp_earned, 50);
    assert_eq!(solution.first_solved_at, now);
}

#[tokio::test]
async fn test_group_assignment_respects_cohort_cap() {
    require_database!();
    let db = common::test_db().await;

    let now = Utc.with_ymd_and_hms(2022, 5, 12, 16, 0, 0).unwrap();

    // 11 joiners cannot fit one group of 10
    let ids = common::unique_user_ids(11);
    let mut group_ids = Vec::new();
    for &id in &ids {
        let profile = db
            .get_or_create_profile(id, &format!("user-{id}"))
            .await
            .unwrap();
        let group_id = ensure_group_assignment(&db, &profile, now)
            .await
            .expect("assignment")
            .expect("group assigned");
        group_ids.push(group_id);
    }

    let mut distinct = group_ids.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert!(distinct.len() >= 2, "11 users need at least 2 groups");

    for group_id in distinct {
        let members = db.group_members(group_id).await.unwrap();
        assert!(members.len() <= 10, "cohort cap exceeded");
    }
}
