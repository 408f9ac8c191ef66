//! Application error type and its HTTP rendering.

use axum::{
    Json,
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::repositories::StoreError;

/// Body returned for invalid input.
pub const INVALID_URL_MESSAGE: &str = "Invalid URL";
/// Body returned when a short identifier cannot be resolved.
pub const NOT_FOUND_MESSAGE: &str = "No short URL found for the given input";
/// Body returned while the allocation counter is still being initialized.
pub const NOT_READY_MESSAGE: &str = "Sorry, this API endpoint is not yet ready to handle requests!";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or unresolvable URL submitted for creation.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No mapping exists for the requested identifier.
    #[error("short URL not found")]
    NotFound,

    /// The allocation counter has not been initialized yet.
    #[error("allocation counter is not ready")]
    ServiceUnavailable,

    /// Every fresh candidate identifier collided with an existing mapping.
    #[error("no free identifier after {attempts} allocation attempts")]
    AllocationConflict { attempts: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

/// A body that is not a urlencoded form has no `url` field to shorten.
impl From<FormRejection> for AppError {
    fn from(e: FormRejection) -> Self {
        Self::InvalidUrl(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidUrl(reason) => {
                tracing::debug!(%reason, "Rejected URL");
                Json(ErrorBody {
                    error: INVALID_URL_MESSAGE,
                })
                .into_response()
            }
            AppError::NotFound => Json(ErrorBody {
                error: NOT_FOUND_MESSAGE,
            })
            .into_response(),
            AppError::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, NOT_READY_MESSAGE).into_response()
            }
            err @ (AppError::AllocationConflict { .. } | AppError::Store(_)) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                )
                    .into_response()
            }
        }
    }
}
