//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Reads the allocation counter
/// 2. **Counter**: Whether the allocator finished initialization
/// 3. **Cache**: Tests Redis PING (always ok when caching is disabled)
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let counter = check_counter(&state);
    let cache = check_cache(&state).await;

    let all_healthy = database.is_ok() && counter.is_ok() && cache.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            counter,
            cache,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks store connectivity by reading the allocation counter.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.allocator.counter().await {
        Ok(Some(counter)) => match state.allocator.baseline() {
            Some(baseline) => CheckStatus::ok(format!(
                "Connected, next identifier: {}, {} allocated since startup",
                counter.seq,
                counter.consumed_since(baseline)
            )),
            None => CheckStatus::ok(format!("Connected, next identifier: {}", counter.seq)),
        },
        Ok(None) => CheckStatus::ok("Connected, counter not created yet"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check store read failed");
            CheckStatus::error("Store unavailable")
        }
    }
}

/// Checks whether creation requests are being accepted.
fn check_counter(state: &AppState) -> CheckStatus {
    match state.allocator.baseline() {
        Some(baseline) => CheckStatus::ok(format!("Ready, baseline: {}", baseline)),
        None => CheckStatus::error("Allocation counter not initialized"),
    }
}

/// Checks cache connectivity via PING command.
async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache available")
    } else {
        CheckStatus::error("Redis connection failed")
    }
}
