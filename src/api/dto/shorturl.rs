//! DTOs for the short URL endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlMapping;

/// Form body of `POST /api/shorturl`.
///
/// A missing `url` field deserializes to an empty string so it is reported
/// as an invalid URL rather than as a malformed form. There is no upper
/// length bound; the store indexes URLs by digest.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenForm {
    #[serde(default)]
    #[validate(length(min = 1), url(message = "Invalid URL format"))]
    pub url: String,
}

/// Successful response of `POST /api/shorturl`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: i64,
}

impl From<UrlMapping> for ShortenResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            original_url: mapping.original,
            short_url: mapping.short,
        }
    }
}
