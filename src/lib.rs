// SPDX-License-Identifier: MIT

//! Codeleague: weekly league and leaderboard backend for a coding-education
//! platform.
//!
//! This crate provides the API for recording solve events, reconstructing the
//! weekly leaderboard, and running the scheduled promotion/demotion rollover
//! across the league hierarchy.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod week;

use config::Config;
use db::Db;
use services::{LeaderboardService, RolloverConfig};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub leaderboard_service: LeaderboardService,
    pub rollover_config: RolloverConfig,
}
