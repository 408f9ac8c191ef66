//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::pg_error::map_sqlx_error;
use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::{MappingRepository, StoreError};

#[derive(sqlx::FromRow)]
struct UrlRow {
    original: String,
    short: i64,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlMapping {
    fn from(row: UrlRow) -> Self {
        UrlMapping::new(row.original, row.short, row.created_at)
    }
}

/// PostgreSQL repository for URL mappings.
///
/// Uniqueness of `original` is enforced by a unique index on its MD5 digest,
/// so lookups compare the digest first and then the exact text.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn find_by_original(&self, original: &str) -> Result<Option<UrlMapping>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT original, short, created_at
            FROM urls
            WHERE md5(original) = md5($1) AND original = $1
            "#,
        )
        .bind(original)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UrlMapping::from))
    }

    async fn find_by_short(&self, short: i64) -> Result<Option<UrlMapping>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT original, short, created_at
            FROM urls
            WHERE short = $1
            "#,
        )
        .bind(short)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UrlMapping::from))
    }

    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (original, short)
            VALUES ($1, $2)
            RETURNING original, short, created_at
            "#,
        )
        .bind(&new_mapping.original)
        .bind(new_mapping.short)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }
}
