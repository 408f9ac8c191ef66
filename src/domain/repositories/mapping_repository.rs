//! Repository trait for URL mappings.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Durable, append-only storage of URL mappings keyed both ways.
///
/// Uniqueness is enforced by the store on both `original` and `short`. There
/// are no update or delete operations.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryMappingRepository`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_mapping.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Finds the mapping for an exact original URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be reached.
    async fn find_by_original(&self, original: &str) -> Result<Option<UrlMapping>, StoreError>;

    /// Finds the mapping for a short identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be reached.
    async fn find_by_short(&self, short: i64) -> Result<Option<UrlMapping>, StoreError>;

    /// Inserts a new mapping. The mapping is committed once this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] naming the colliding field if
    /// either `original` or `short` is already mapped.
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StoreError>;

    /// Counts all committed mappings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be reached.
    async fn count(&self) -> Result<i64, StoreError>;
}
