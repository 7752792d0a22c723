// SPDX-License-Identifier: MIT

//! The fixed league hierarchy.
//!
//! The ordering is immutable configuration data; promotion and demotion are
//! pure lookups over it. Tier values read back from the database go through
//! [`League::from_str`], which fails loudly on an unknown tier rather than
//! clamping to a default (a bad tier in storage means corrupted data).

use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

/// League tiers, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum League {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

/// All tiers in promotion order.
pub const LEAGUE_ORDER: [League; 5] = [
    League::Bronze,
    League::Silver,
    League::Gold,
    League::Platinum,
    League::Diamond,
];

impl League {
    fn position(self) -> usize {
        LEAGUE_ORDER
            .iter()
            .position(|&l| l == self)
            .unwrap_or_default()
    }

    /// One tier up, clamped at the top (promoting from Diamond is a no-op).
    pub fn next(self) -> League {
        let idx = self.position();
        LEAGUE_ORDER[(idx + 1).min(LEAGUE_ORDER.len() - 1)]
    }

    /// One tier down, clamped at the bottom (demoting from Bronze is a no-op).
    pub fn previous(self) -> League {
        let idx = self.position();
        LEAGUE_ORDER[idx.saturating_sub(1)]
    }

    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            League::Bronze => "bronze",
            League::Silver => "silver",
            League::Gold => "gold",
            League::Platinum => "platinum",
            League::Diamond => "diamond",
        }
    }
}

impl FromStr for League {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bronze" => Ok(League::Bronze),
            "silver" => Ok(League::Silver),
            "gold" => Ok(League::Gold),
            "platinum" => Ok(League::Platinum),
            "diamond" => Ok(League::Diamond),
            other => Err(AppError::Data(format!("Unknown league tier: {other}"))),
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
