//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache of short identifier → original URL.
///
/// Mappings never change once committed, so entries never need invalidation;
/// the TTL only bounds memory use. Implementations must be thread-safe, and
/// cache failures must degrade to store lookups rather than fail requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the original URL for a short identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_url(&self, short: i64) -> CacheResult<Option<String>>;

    /// Stores a committed mapping with an optional TTL in seconds
    /// (implementation-specific default if `None`).
    async fn set_url(&self, short: i64, original_url: &str, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
