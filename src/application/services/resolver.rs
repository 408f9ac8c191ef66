//! Short identifier resolution.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Looks up the original URL for a short identifier.
///
/// Reads go through the cache first. Only committed mappings are ever
/// cached, and since mappings are immutable a cached entry is never stale.
/// Misses are never cached.
pub struct Resolver<M>
where
    M: MappingRepository + ?Sized,
{
    mappings: Arc<M>,
    cache: Arc<dyn CacheService>,
}

impl<M> Resolver<M>
where
    M: MappingRepository + ?Sized,
{
    pub fn new(mappings: Arc<M>, cache: Arc<dyn CacheService>) -> Self {
        Self { mappings, cache }
    }

    /// Returns the original URL mapped to `short`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `short` was never allocated, and
    /// [`AppError::Store`] if the mapping store fails. Cache failures are
    /// logged and treated as misses.
    pub async fn resolve(&self, short: i64) -> Result<String, AppError> {
        match self.cache.get_url(short).await {
            Ok(Some(url)) => {
                metrics::counter!("shorturl_resolutions_total", "outcome" => "cache_hit")
                    .increment(1);
                return Ok(url);
            }
            Ok(None) => debug!(short, "Cache miss"),
            Err(e) => warn!(short, error = %e, "Cache lookup failed"),
        }

        let Some(mapping) = self.mappings.find_by_short(short).await? else {
            metrics::counter!("shorturl_resolutions_total", "outcome" => "not_found").increment(1);
            return Err(AppError::NotFound);
        };

        if let Err(e) = self.cache.set_url(short, &mapping.original, None).await {
            warn!(short, error = %e, "Failed to cache mapping");
        }

        metrics::counter!("shorturl_resolutions_total", "outcome" => "store").increment(1);
        Ok(mapping.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UrlMapping;
    use crate::domain::repositories::{MockMappingRepository, StoreError};
    use crate::infrastructure::cache::{CacheError, CacheResult, NullCache};
    use async_trait::async_trait;
    use chrono::Utc;
    use dashmap::DashMap;

    #[derive(Default)]
    struct MapCache {
        entries: DashMap<i64, String>,
    }

    #[async_trait]
    impl CacheService for MapCache {
        async fn get_url(&self, short: i64) -> CacheResult<Option<String>> {
            Ok(self.entries.get(&short).map(|u| u.clone()))
        }

        async fn set_url(&self, short: i64, original_url: &str, _ttl: Option<u64>) -> CacheResult<()> {
            self.entries.insert(short, original_url.to_string());
            Ok(())
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    struct DownCache;

    #[async_trait]
    impl CacheService for DownCache {
        async fn get_url(&self, _short: i64) -> CacheResult<Option<String>> {
            Err(CacheError::OperationError("connection reset".into()))
        }

        async fn set_url(&self, _short: i64, _url: &str, _ttl: Option<u64>) -> CacheResult<()> {
            Err(CacheError::OperationError("connection reset".into()))
        }

        async fn health_check(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_find_by_short()
            .withf(|short| *short == 1)
            .times(1)
            .returning(|short| {
                Ok(Some(UrlMapping::new(
                    "https://example.com/b".to_string(),
                    short,
                    Utc::now(),
                )))
            });

        let resolver = Resolver::new(Arc::new(mappings), Arc::new(NullCache::new()));

        assert_eq!(resolver.resolve(1).await.unwrap(), "https://example.com/b");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_find_by_short()
            .times(1)
            .returning(|_| Ok(None));

        let resolver = Resolver::new(Arc::new(mappings), Arc::new(NullCache::new()));

        assert!(matches!(resolver.resolve(99).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_reported_as_not_found() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_find_by_short()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".into())));

        let resolver = Resolver::new(Arc::new(mappings), Arc::new(NullCache::new()));

        assert!(matches!(resolver.resolve(1).await, Err(AppError::Store(_))));
    }

    #[tokio::test]
    async fn test_second_lookup_served_from_cache() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_find_by_short()
            .times(1)
            .returning(|short| {
                Ok(Some(UrlMapping::new(
                    "https://example.com/a".to_string(),
                    short,
                    Utc::now(),
                )))
            });

        let cache = Arc::new(MapCache::default());
        let resolver = Resolver::new(Arc::new(mappings), cache.clone());

        assert_eq!(resolver.resolve(0).await.unwrap(), "https://example.com/a");
        assert_eq!(resolver.resolve(0).await.unwrap(), "https://example.com/a");
        assert_eq!(cache.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_find_by_short()
            .times(2)
            .returning(|_| Ok(None));

        let cache = Arc::new(MapCache::default());
        let resolver = Resolver::new(Arc::new(mappings), cache.clone());

        assert!(resolver.resolve(7).await.is_err());
        assert!(resolver.resolve(7).await.is_err());
        assert!(cache.entries.is_empty());
    }

    #[tokio::test]
    async fn test_cache_failure_falls_back_to_store() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_find_by_short()
            .times(2)
            .returning(|short| {
                Ok(Some(UrlMapping::new(
                    "https://example.com/a".to_string(),
                    short,
                    Utc::now(),
                )))
            });

        let resolver = Resolver::new(Arc::new(mappings), Arc::new(DownCache));

        assert_eq!(resolver.resolve(0).await.unwrap(), "https://example.com/a");
        assert_eq!(resolver.resolve(0).await.unwrap(), "https://example.com/a");
    }
}
