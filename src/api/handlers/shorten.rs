//! Handler for the create-or-fetch endpoint.

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use validator::Validate;

use crate::api::dto::shorturl::{ShortenForm, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the short identifier for a URL, allocating one if needed.
///
/// # Endpoint
///
/// `POST /api/shorturl` with form field `url`
///
/// # Response
///
/// ```json
/// { "original_url": "https://example.com/a", "short_url": 0 }
/// ```
///
/// Submitting the same URL again returns the same `short_url`.
///
/// # Errors
///
/// - `{ "error": "Invalid URL" }` if the URL is malformed, its host does not
///   resolve, or the body is not a form carrying `url`
/// - 503 Service Unavailable until the allocation counter is initialized
/// - 500 Internal Server Error on store failures
pub async fn shorten_handler(
    State(state): State<AppState>,
    form: Result<Form<ShortenForm>, FormRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    // Checked before validation so DNS lookups are not wasted while starting up.
    if !state.allocator.is_ready() {
        return Err(AppError::ServiceUnavailable);
    }

    let Form(form) = form?;
    form.validate()?;
    state.url_validator.validate(&form.url).await?;

    let mapping = state.allocator.get_or_create(&form.url).await?;

    Ok(Json(mapping.into()))
}
