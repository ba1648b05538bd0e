//! Link creation and redirect resolution service.

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_validator::{storable_form, validate_url};
use serde_json::json;

/// Longest accepted `expires_in_days` (about a hundred years).
pub const MAX_EXPIRES_IN_DAYS: i64 = 36_500;

/// Input for [`LinkService::shorten`].
#[derive(Debug, Clone, Default)]
pub struct ShortenInput {
    pub original_url: String,
    /// Empty string is treated as absent.
    pub custom_code: Option<String>,
    /// `None` or `Some(0)` means the link never expires.
    pub expires_in_days: Option<i64>,
    /// Authenticated caller, if any.
    pub owner_id: Option<i64>,
}

/// Service for creating short links and resolving them on redirect.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    base_url: String,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public prefix used to build `short_url` values,
    /// e.g. `http://127.0.0.1:8000`.
    pub fn new(link_repository: Arc<L>, base_url: String) -> Self {
        Self {
            link_repository,
            base_url,
        }
    }

    /// Creates a shortened URL.
    ///
    /// # Code Selection
    ///
    /// - A non-empty `custom_code` is validated and checked for existing use
    /// - Otherwise a random 6-character code is generated without a prior
    ///   lookup; a collision surfaces as an internal error and is not retried
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `original_url` is empty or not a valid http(s) URL
    /// - `custom_code` is malformed, reserved, or already exists
    /// - `expires_in_days` is negative or too large
    ///
    /// Returns [`AppError::Internal`] on a generated-code collision or database errors.
    pub async fn shorten(&self, input: ShortenInput) -> Result<ShortenedUrl, AppError> {
        let trimmed = input.original_url.trim();
        if trimmed.is_empty() {
            return Err(AppError::bad_request(
                "Original URL is required.",
                json!({ "field": "original_url" }),
            ));
        }

        let parsed = validate_url(trimmed).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;
        let original_url = storable_form(trimmed, &parsed);

        let expires_at = match input.expires_in_days {
            None | Some(0) => None,
            Some(days) if (1..=MAX_EXPIRES_IN_DAYS).contains(&days) => {
                Some(Utc::now() + Duration::days(days))
            }
            Some(days) => {
                return Err(AppError::bad_request(
                    "expires_in_days must be between 0 and 36500",
                    json!({ "expires_in_days": days }),
                ));
            }
        };

        let custom_code = input.custom_code.filter(|c| !c.is_empty());
        let is_custom = custom_code.is_some();

        let short_code = match custom_code {
            Some(custom) => {
                validate_custom_code(&custom)?;

                if self.link_repository.find_by_code(&custom).await?.is_some() {
                    return Err(custom_code_taken(&custom));
                }

                custom
            }
            None => generate_code(),
        };

        let new_link = NewShortenedUrl {
            user_id: input.owner_id,
            original_url,
            short_code: short_code.clone(),
            expires_at,
        };

        match self.link_repository.create(new_link).await {
            Ok(link) => {
                metrics::counter!("links_created_total").increment(1);
                tracing::info!(code = %link.short_code, owner = ?link.user_id, "Short link created");
                Ok(link)
            }
            Err(AppError::Conflict { .. }) if is_custom => Err(custom_code_taken(&short_code)),
            Err(AppError::Conflict { details, .. }) => Err(AppError::internal(
                "Generated short code collided with an existing one",
                json!({ "code": short_code, "constraint": details["constraint"] }),
            )),
            Err(e) => Err(e),
        }
    }

    /// Resolves a short code for redirect and counts the click.
    ///
    /// The click is recorded with a single atomic update that only matches
    /// links unexpired at the current instant. When nothing matched, a lookup
    /// tells apart an unknown code from an expired one using the same
    /// instant; neither case changes `click_count`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns [`AppError::Gone`] if the link has expired.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(&self, code: &str) -> Result<ShortenedUrl, AppError> {
        let now = Utc::now();

        if let Some(link) = self.link_repository.record_click(code, now).await? {
            metrics::counter!("redirects_total").increment(1);
            return Ok(link);
        }

        match self.link_repository.find_by_code(code).await? {
            Some(link) if link.is_expired_at(now) => {
                metrics::counter!("expired_hits_total").increment(1);
                tracing::debug!(code = %code, expires_at = ?link.expires_at, "Expired link requested");
                Err(AppError::gone(
                    "URL has expired",
                    json!({ "code": code, "expires_at": link.expires_at }),
                ))
            }
            // Unknown, or created after the click update ran.
            _ => Err(AppError::not_found(
                "URL not found",
                json!({ "code": code }),
            )),
        }
    }

    /// Builds the public short URL for a code: `{base_url}/s/{code}`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/s/{}", self.base_url.trim_end_matches('/'), code)
    }
}

fn custom_code_taken(code: &str) -> AppError {
    AppError::bad_request("Custom code already exists.", json!({ "code": code }))
}
