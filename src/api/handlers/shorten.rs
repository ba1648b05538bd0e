//! Handler for link shortening endpoint.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::application::services::{AuthUser, ShortenInput};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shortened URL.
///
/// # Endpoint
///
/// `POST /shorten/`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/page",
///   "custom_code": "promo",     // optional
///   "expires_in_days": 7        // optional, number or numeric string
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_url": "http://127.0.0.1:8000/s/promo",
///   "original_url": "https://example.com/page",
///   "expires_at": "2026-10-21T12:00:00Z"
/// }
/// ```
///
/// When a valid bearer token is presented the link is owned by that user.
///
/// # Errors
///
/// Returns 400 Bad Request on validation failure or a taken custom code.
/// Returns 401 Unauthorized if a presented token is invalid.
pub async fn shorten_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;

    let link = state
        .link_service
        .shorten(ShortenInput {
            original_url: payload.original_url.unwrap_or_default(),
            custom_code: payload.custom_code,
            expires_in_days: payload.expires_in_days,
            owner_id: auth.map(|Extension(a)| a.user.id),
        })
        .await?;

    let short_url = state.link_service.short_url(&link.short_code);

    Ok(Json(ShortenResponse::new(link, short_url)))
}
