mod common;

use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use shorturl::application::services::Allocator;
use shorturl::domain::entities::{NewUrlMapping, SHORT_URL_COUNTER};
use shorturl::domain::repositories::{CounterRepository, MappingRepository};
use shorturl::infrastructure::memory::{InMemoryCounterRepository, InMemoryMappingRepository};
use shorturl::infrastructure::persistence::{PgCounterRepository, PgMappingRepository};
use shorturl::state::SharedAllocator;

const INSTANCES: usize = 4;

/// Several allocators sharing one pair of stores, as separate processes would.
async fn ready_allocators(
    counters: Arc<dyn CounterRepository>,
    mappings: Arc<dyn MappingRepository>,
) -> Vec<Arc<SharedAllocator>> {
    let mut allocators = Vec::with_capacity(INSTANCES);
    for _ in 0..INSTANCES {
        let allocator = Arc::new(Allocator::new(counters.clone(), mappings.clone()));
        allocator.initialize().await.unwrap();
        allocators.push(allocator);
    }
    allocators
}

async fn create_concurrently(
    allocators: &[Arc<SharedAllocator>],
    urls: Vec<String>,
) -> Vec<(String, i64)> {
    let handles: Vec<_> = urls
        .into_iter()
        .enumerate()
        .map(|(i, url)| {
            let allocator = allocators[i % allocators.len()].clone();
            tokio::spawn(async move {
                let mapping = allocator.get_or_create(&url).await.unwrap();
                (url, mapping.short)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_urls_get_distinct_ids() {
    let counters = Arc::new(InMemoryCounterRepository::new());
    let mappings = Arc::new(InMemoryMappingRepository::new());
    let allocators = ready_allocators(counters.clone(), mappings.clone()).await;

    let urls: Vec<String> = (0..200)
        .map(|i| format!("https://example.com/{i}"))
        .collect();
    let results = create_concurrently(&allocators, urls).await;

    let shorts: HashSet<i64> = results.iter().map(|(_, short)| *short).collect();
    assert_eq!(shorts.len(), 200);
    assert_eq!(mappings.count().await.unwrap(), 200);

    // No insert failed, so no identifier was skipped.
    assert_eq!(shorts, (0..200).collect::<HashSet<i64>>());
    assert_eq!(counters.find(SHORT_URL_COUNTER).await.unwrap().unwrap().seq, 200);

    for (url, short) in results {
        let stored = mappings.find_by_short(short).await.unwrap().unwrap();
        assert_eq!(stored.original, url);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_url_maps_once() {
    let counters = Arc::new(InMemoryCounterRepository::new());
    let mappings = Arc::new(InMemoryMappingRepository::new());
    let allocators = ready_allocators(counters.clone(), mappings.clone()).await;

    let urls = vec!["https://example.com/same".to_string(); 64];
    let results = create_concurrently(&allocators, urls).await;

    let shorts: HashSet<i64> = results.iter().map(|(_, short)| *short).collect();
    assert_eq!(shorts.len(), 1);
    assert_eq!(mappings.count().await.unwrap(), 1);

    // Racing requests may each consume an identifier before losing the
    // insert; those values become gaps but never a second mapping.
    let seq = counters.find(SHORT_URL_COUNTER).await.unwrap().unwrap().seq;
    assert!((1..=64).contains(&seq));
}

#[tokio::test]
async fn test_occupied_ids_are_skipped() {
    let counters = Arc::new(InMemoryCounterRepository::with_counter(SHORT_URL_COUNTER, 0));
    let mappings = Arc::new(InMemoryMappingRepository::new());

    // Identifiers 0..3 were taken behind the counter's back.
    for short in 0..3 {
        mappings
            .insert(NewUrlMapping::new(format!("https://legacy.example/{short}"), short))
            .await
            .unwrap();
    }

    let allocator = Allocator::new(counters.clone(), mappings.clone());
    allocator.initialize().await.unwrap();

    let mapping = allocator
        .get_or_create("https://example.com/new")
        .await
        .unwrap();

    assert_eq!(mapping.short, 3);
    assert_eq!(counters.find(SHORT_URL_COUNTER).await.unwrap().unwrap().seq, 4);
}

#[tokio::test]
async fn test_conflict_exhaustion_fails() {
    let counters = Arc::new(InMemoryCounterRepository::with_counter(SHORT_URL_COUNTER, 0));
    let mappings = Arc::new(InMemoryMappingRepository::new());

    for short in 0..10 {
        mappings
            .insert(NewUrlMapping::new(format!("https://legacy.example/{short}"), short))
            .await
            .unwrap();
    }

    let allocator = Allocator::new(counters.clone(), mappings.clone());
    allocator.initialize().await.unwrap();

    let result = allocator.get_or_create("https://example.com/new").await;

    assert!(result.is_err());
    assert!(
        mappings
            .find_by_original("https://example.com/new")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test]
async fn test_postgres_concurrent_instances(pool: PgPool) {
    let pool = Arc::new(pool);
    let counters = Arc::new(PgCounterRepository::new(pool.clone()));
    let mappings = Arc::new(PgMappingRepository::new(pool.clone()));
    let allocators = ready_allocators(counters.clone(), mappings.clone()).await;

    let urls: Vec<String> = (0..40)
        .map(|i| format!("https://example.com/{i}"))
        .collect();
    let results = create_concurrently(&allocators, urls).await;

    let shorts: HashSet<i64> = results.iter().map(|(_, short)| *short).collect();
    assert_eq!(shorts.len(), 40);
    assert_eq!(mappings.count().await.unwrap(), 40);
    assert_eq!(common::counter_value(&pool, SHORT_URL_COUNTER).await, Some(40));
}

#[sqlx::test]
async fn test_postgres_same_url_maps_once(pool: PgPool) {
    let pool = Arc::new(pool);
    let counters = Arc::new(PgCounterRepository::new(pool.clone()));
    let mappings = Arc::new(PgMappingRepository::new(pool.clone()));
    let allocators = ready_allocators(counters, mappings.clone()).await;

    let urls = vec!["https://example.com/same".to_string(); 16];
    let results = create_concurrently(&allocators, urls).await;

    let shorts: HashSet<i64> = results.iter().map(|(_, short)| *short).collect();
    assert_eq!(shorts.len(), 1);
    assert_eq!(mappings.count().await.unwrap(), 1);
}
