// SPDX-License-Identifier: MIT

//! Shared-secret authentication for the rollover trigger.
//!
//! The external scheduler presents a bearer token that must match the
//! configured `ROLLOVER_SECRET` exactly. A mismatch is rejected before any
//! engine code runs, so a bad trigger never causes partial writes.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Require the scheduler's shared bearer secret on `/rollover/*` routes.
pub async fn require_rollover_secret(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => {
            tracing::warn!("Blocked rollover trigger without bearer token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    if token != state.config.rollover_secret {
        tracing::warn!("Blocked rollover trigger with invalid secret");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
