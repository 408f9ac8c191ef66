//! API route configuration.

use crate::api::handlers::{redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short URL routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorturl`              - Create or fetch a mapping
/// - `GET  /shorturl/{shorturl}`   - Redirect to the original URL
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorturl", post(shorten_handler))
        .route("/shorturl/{shorturl}", get(redirect_handler))
}
