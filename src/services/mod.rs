// SPDX-License-Identifier: MIT

//! Business logic services.

pub mod leaderboard;
pub mod membership;
pub mod promotion;
pub mod scores;

pub use leaderboard::{LeaderboardService, LeaderboardView};
pub use promotion::{RolloverConfig, RolloverEngine, RolloverReport};
pub use scores::ScoreService;
