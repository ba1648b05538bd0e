//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten/`         - Create short link (optional Bearer token)
//! - `GET  /s/{short_code}/`  - Short link redirect
//! - `POST /register/`        - Create account
//! - `POST /login/`           - Issue token
//! - `POST /logout/`          - Revoke presented token
//! - `GET  /stats/`           - Per-user stats (Bearer token required)
//! - `POST /api-token-auth/`  - Obtain token
//! - `GET  /health`           - Health check
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, strict on credential endpoints
//! - **Authentication** - Bearer token guards per route group
//! - **Path normalization** - Trailing slash handling

use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{credential_routes, protected_routes, public_routes};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let credentials = credential_routes().layer(rate_limit::secure_layer(behind_proxy));

    let general = Router::new()
        .merge(public_routes(state.clone()))
        .merge(protected_routes(state.clone()))
        .layer(rate_limit::layer(behind_proxy));

    let router = Router::new()
        .merge(credentials)
        .merge(general)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
