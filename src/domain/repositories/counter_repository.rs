//! Repository trait for the allocation counter.

use crate::domain::entities::AllocationCounter;
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Durable holder of named, monotonically increasing sequences.
///
/// The counter store is the single source of truth for identifier
/// allocation. Implementations must make [`increment_and_fetch`] one atomic
/// durable operation so that callers in different processes sharing the same
/// store never observe the same value.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCounterRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryCounterRepository`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
///
/// [`increment_and_fetch`]: CounterRepository::increment_and_fetch
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Returns the counter's current value, creating it with `0` if absent.
    ///
    /// Idempotent under concurrent callers: only one record per name ever
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be reached.
    async fn get_or_init(&self, name: &str) -> Result<i64, StoreError>;

    /// Atomically increases the counter by one and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CounterMissing`] if the counter was never
    /// initialized, and [`StoreError::Unavailable`] if the store cannot be
    /// reached.
    async fn increment_and_fetch(&self, name: &str) -> Result<i64, StoreError>;

    /// Reads the counter without creating it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be reached.
    async fn find(&self, name: &str) -> Result<Option<AllocationCounter>, StoreError>;
}
