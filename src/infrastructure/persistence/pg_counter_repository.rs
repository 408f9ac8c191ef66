//! PostgreSQL implementation of the counter repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::pg_error::map_sqlx_error;
use crate::domain::entities::AllocationCounter;
use crate::domain::repositories::{CounterRepository, StoreError};

/// PostgreSQL repository for named allocation counters.
///
/// Increments are a single `UPDATE ... RETURNING` statement, so the row lock
/// taken by Postgres serializes concurrent callers across every process that
/// shares the database.
pub struct PgCounterRepository {
    pool: Arc<PgPool>,
}

impl PgCounterRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterRepository for PgCounterRepository {
    async fn get_or_init(&self, name: &str) -> Result<i64, StoreError> {
        // A conflicting concurrent insert blocks until the winner commits, so
        // the follow-up SELECT always sees exactly one row.
        sqlx::query(
            r#"
            INSERT INTO counters (name, seq)
            VALUES ($1, 0)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .execute(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query_scalar::<_, i64>("SELECT seq FROM counters WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| StoreError::CounterMissing(name.to_string()))
    }

    async fn increment_and_fetch(&self, name: &str) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE counters
            SET seq = seq + 1
            WHERE name = $1
            RETURNING seq
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?
        .ok_or_else(|| StoreError::CounterMissing(name.to_string()))
    }

    async fn find(&self, name: &str) -> Result<Option<AllocationCounter>, StoreError> {
        let seq = sqlx::query_scalar::<_, i64>("SELECT seq FROM counters WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(seq.map(|seq| AllocationCounter::new(name, seq)))
    }
}
