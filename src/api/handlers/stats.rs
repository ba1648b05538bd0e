//! Handler for per-user link statistics.

use axum::{Extension, Json, extract::State};

use crate::api::dto::stats::UrlStatsItem;
use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links with click counts.
///
/// # Endpoint
///
/// `GET /stats/` (bearer token required)
///
/// Ordered by creation, oldest first. Not paginated.
pub async fn stats_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<UrlStatsItem>>, AppError> {
    let links = state.stats_service.user_stats(auth.user.id).await?;

    Ok(Json(links.into_iter().map(UrlStatsItem::from).collect()))
}
