// SPDX-License-Identifier: MIT

//! Middleware modules (authentication, security, etc.).

pub mod auth;
pub mod rollover_auth;
pub mod security;

pub use auth::require_auth;
pub use rollover_auth::require_rollover_secret;
