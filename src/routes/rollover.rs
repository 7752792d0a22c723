// SPDX-License-Identifier: MIT

//! Rollover trigger route.
//!
//! Called by the external scheduler once per week, not by users. Protected by
//! the shared-secret middleware applied in routes/mod.rs.

use crate::error::Result;
use crate::services::{RolloverEngine, RolloverReport};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

/// Rollover routes (shared-secret protected).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/rollover/run", post(run_rollover))
}

/// Run the weekly promotion/demotion engine for the week that just ended.
///
/// Safe to re-trigger: already-processed groups are skipped via their
/// `processed_at` marker.
async fn run_rollover(State(state): State<Arc<AppState>>) -> Result<Json<RolloverReport>> {
    let engine = RolloverEngine::new(state.db.clone(), state.rollover_config);
    let report = engine.run(chrono::Utc::now()).await?;
    Ok(Json(report))
}
