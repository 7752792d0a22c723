// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod group;
pub mod league;
pub mod profile;
pub mod solution;

pub use group::{LeaderboardGroup, GROUP_SIZE_LIMIT};
pub use league::{League, LEAGUE_ORDER};
pub use profile::Profile;
pub use solution::{ProblemSolution, STATUS_SOLVED};
