//! API route configuration.
//!
//! Routes are grouped by the guard and rate limiter they share. Guards are
//! attached here with `route_layer`, limiters in [`crate::routes::app_router`].

use crate::api::handlers::{
    api_token_auth_handler, health_handler, login_handler, logout_handler, redirect_handler,
    register_handler, shorten_handler, stats_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Credential endpoints, no guard.
///
/// - `POST /register`        - Create an account, returns a token
/// - `POST /login`           - Issue a fresh token
/// - `POST /api-token-auth`  - Exchange credentials for a token
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/api-token-auth", post(api_token_auth_handler))
}

/// Public endpoints.
///
/// - `POST /shorten`          - Create a short link, owned when authenticated
/// - `POST /logout`           - Revoke the presented token
/// - `GET  /s/{short_code}`   - Redirect (no guard)
/// - `GET  /health`           - Database probe (no guard)
pub fn public_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/logout", post(logout_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::optional_user))
        .route("/s/{short_code}", get(redirect_handler))
        .route("/health", get(health_handler))
}

/// Endpoints protected by Bearer token authentication.
///
/// - `GET /stats` - Caller's links with click counts
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::require_user))
}

/// All routes with their guards, without rate limiting.
pub fn guarded_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(credential_routes())
        .merge(public_routes(state.clone()))
        .merge(protected_routes(state))
}
