//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::warn;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short identifier to its original URL.
///
/// # Endpoint
///
/// `GET /api/shorturl/{shorturl}`
///
/// # Response
///
/// 302 Found with `Location` set to the original URL.
///
/// # Errors
///
/// Returns `{ "error": "No short URL found for the given input" }` if the
/// path segment is not an integer or no mapping exists for it.
pub async fn redirect_handler(
    Path(shorturl): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let short: i64 = shorturl.parse().map_err(|_| AppError::NotFound)?;

    let original = state.resolver.resolve(short).await?;

    Ok(found(&original))
}

/// Builds a 302 response to `target`.
///
/// Stored URLs are kept byte-for-byte as submitted. Anything that is not
/// plain visible ASCII goes through the URL parser first so the header
/// carries the percent-encoded form.
fn found(target: &str) -> Response {
    let location = target
        .is_ascii()
        .then(|| HeaderValue::from_str(target).ok())
        .flatten()
        .or_else(|| {
            Url::parse(target)
                .ok()
                .and_then(|u| HeaderValue::from_str(u.as_str()).ok())
        });

    match location {
        Some(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        None => {
            warn!("Stored URL cannot be used as a Location header");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
