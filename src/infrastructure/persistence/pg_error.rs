//! Translation of SQLx errors into store errors.

use crate::domain::repositories::{StoreError, UniqueField};

/// Unique index on `md5(urls.original)`.
pub const URLS_ORIGINAL_KEY: &str = "urls_original_key";
/// Unique constraint on `urls.short`.
pub const URLS_SHORT_KEY: &str = "urls_short_key";

/// Maps a SQLx error onto the store error taxonomy.
///
/// Unique violations are classified by constraint name. Connection, pool and
/// TLS failures (including pool acquire timeouts) become
/// [`StoreError::Unavailable`].
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return match db.constraint() {
            Some(URLS_ORIGINAL_KEY) => StoreError::DuplicateKey(UniqueField::Original),
            Some(URLS_SHORT_KEY) => StoreError::DuplicateKey(UniqueField::Short),
            other => StoreError::Query(format!("unique violation on {:?}", other)),
        };
    }

    let message = e.to_string();
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        _ => StoreError::Query(message),
    }
}
