//! Bearer token authentication guards.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Requires a valid bearer token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Resolve the token hash to an active token and its user
/// 3. Update `last_used_at` timestamp
/// 4. Insert [`AuthUser`](crate::application::services::AuthUser) into request extensions
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing
/// - Scheme is not `Bearer`
/// - Token is not found or revoked
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/stats", get(stats_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_user));
/// ```
pub async fn require_user(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    authenticate_parts(&st, &mut parts).await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Authenticates when an `Authorization` header is present.
///
/// Without the header the request proceeds anonymously. A header that is
/// present but malformed, unknown or revoked is rejected with 401.
pub async fn optional_user(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    if parts.headers.contains_key(header::AUTHORIZATION) {
        authenticate_parts(&st, &mut parts).await?;
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

async fn authenticate_parts(st: &AppState, parts: &mut Parts) -> Result<(), AppError> {
    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let auth = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(auth);

    Ok(())
}
