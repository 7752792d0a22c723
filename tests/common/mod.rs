// SPDX-License-Identifier: MIT

use codeleague::config::Config;
use codeleague::db::Db;
use codeleague::routes::create_router;
use codeleague::services::{LeaderboardService, RolloverConfig};
use codeleague::AppState;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is available.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: DATABASE_URL not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    Db::connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> Db {
    Db::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let leaderboard_service = LeaderboardService::new(db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        leaderboard_service,
        rollover_config: RolloverConfig::default(),
    });

    (create_router(state.clone()), state)
}

/// Fresh user ids for a test, unique across test runs so leftover rows from
/// earlier runs against the same database can't interfere.
#[allow(dead_code)]
pub fn unique_user_ids(count: usize) -> Vec<i64> {
    static COUNTER: AtomicI64 = AtomicI64::new(0);
    let base = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_micros() as i64;
    let offset = COUNTER.fetch_add(count as i64, Ordering::Relaxed);
    (0..count as i64).map(|i| base + offset + i).collect()
}
