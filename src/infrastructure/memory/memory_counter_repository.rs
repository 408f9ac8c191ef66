//! Process-local implementation of the counter repository.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::entities::AllocationCounter;
use crate::domain::repositories::{CounterRepository, StoreError};

/// In-memory counters backed by a [`DashMap`].
///
/// Each increment runs under the write lock of the key's shard, which makes
/// it atomic for every allocator sharing this instance. Nothing survives a
/// restart, so this backend is meant for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryCounterRepository {
    counters: DashMap<String, i64>,
}

impl InMemoryCounterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository with one counter already at `seq`.
    pub fn with_counter(name: impl Into<String>, seq: i64) -> Self {
        let counters = DashMap::new();
        counters.insert(name.into(), seq);
        Self { counters }
    }
}

#[async_trait]
impl CounterRepository for InMemoryCounterRepository {
    async fn get_or_init(&self, name: &str) -> Result<i64, StoreError> {
        Ok(*self.counters.entry(name.to_string()).or_insert(0))
    }

    async fn increment_and_fetch(&self, name: &str) -> Result<i64, StoreError> {
        let mut seq = self
            .counters
            .get_mut(name)
            .ok_or_else(|| StoreError::CounterMissing(name.to_string()))?;
        *seq += 1;
        Ok(*seq)
    }

    async fn find(&self, name: &str) -> Result<Option<AllocationCounter>, StoreError> {
        Ok(self
            .counters
            .get(name)
            .map(|seq| AllocationCounter::new(name, *seq)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_or_init_creates_once() {
        let repo = InMemoryCounterRepository::new();

        assert_eq!(repo.get_or_init("shortUrl").await.unwrap(), 0);
        repo.increment_and_fetch("shortUrl").await.unwrap();
        assert_eq!(repo.get_or_init("shortUrl").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_increment_missing_counter() {
        let repo = InMemoryCounterRepository::new();

        let result = repo.increment_and_fetch("missing").await;

        assert!(matches!(result, Err(StoreError::CounterMissing(name)) if name == "missing"));
        assert!(repo.find("missing").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_distinct() {
        let repo = Arc::new(InMemoryCounterRepository::with_counter("shortUrl", 0));

        let mut handles = Vec::new();
        for _ in 0..64 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.increment_and_fetch("shortUrl").await.unwrap()
            }));
        }

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await.unwrap());
        }
        values.sort_unstable();

        assert_eq!(values, (1..=64).collect::<Vec<_>>());
        assert_eq!(repo.find("shortUrl").await.unwrap().unwrap().seq, 64);
    }
}
