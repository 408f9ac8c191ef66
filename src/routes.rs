//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`                       - Index page
//! - `GET  /health`                 - Health check: store, counter, cache
//! - `POST /api/shorturl`           - Create or fetch a short URL
//! - `GET  /api/shorturl/{id}`      - Redirect to the original URL
//! - `/public/*`                    - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the API
//! - **Rate limiting** - Per-IP token bucket on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Constructs the application router with all routes and middleware.
///
/// When `config.behind_proxy` is set, rate limiting reads the client IP from
/// forwarding headers instead of the peer socket address.
pub fn app_router(state: AppState, config: &Config) -> NormalizePath<Router> {
    let api_router = if config.behind_proxy {
        api::routes::routes().layer(rate_limit::proxied_layer())
    } else {
        api::routes::routes().layer(rate_limit::layer())
    };

    let router = Router::new()
        .route_service("/", ServeFile::new(&config.index_file))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest_service("/public", ServeDir::new(&config.public_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
