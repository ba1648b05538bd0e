//! Handlers for registration, login, logout and token issuance.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::auth::{CredentialsRequest, MessageResponse, RegisterResponse, TokenResponse};
use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account and returns its first token.
///
/// # Endpoint
///
/// `POST /register/`
///
/// # Errors
///
/// Returns 400 Bad Request on missing fields, a malformed username, or a
/// username that already exists.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (_user, token) = state
        .auth_service
        .register(&payload.username, &payload.password)
        .await?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully",
        token,
    }))
}

/// Verifies credentials and issues a fresh token.
///
/// # Endpoint
///
/// `POST /login/`
///
/// # Errors
///
/// Returns 400 Bad Request on missing fields.
/// Returns 401 Unauthorized with "Invalid credentials" on a bad pair.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let token = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Revokes the presented token, if any.
///
/// # Endpoint
///
/// `POST /logout/`
///
/// Always answers 200 once the optional guard lets the request through.
pub async fn logout_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<MessageResponse>, AppError> {
    if let Some(Extension(auth)) = auth {
        state.auth_service.logout(&auth).await?;
    }

    Ok(Json(MessageResponse {
        message: "Logged out",
    }))
}

/// Exchanges credentials for a token.
///
/// # Endpoint
///
/// `POST /api-token-auth/`
///
/// # Errors
///
/// Returns 400 Bad Request on missing fields or bad credentials.
pub async fn api_token_auth_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let token = state
        .auth_service
        .obtain_token(&payload.username, &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}
