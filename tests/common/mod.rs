#![allow(dead_code)]

use axum::Router;
use axum::routing::get;
use sqlx::PgPool;
use std::sync::Arc;
use shorturl::api;
use shorturl::api::handlers::health_handler;
use shorturl::config::{Config, StorageBackend};
use shorturl::domain::repositories::{CounterRepository, MappingRepository};
use shorturl::infrastructure::cache::NullCache;
use shorturl::infrastructure::memory::{InMemoryCounterRepository, InMemoryMappingRepository};
use shorturl::infrastructure::persistence::{PgCounterRepository, PgMappingRepository};
use shorturl::state::AppState;
use shorturl::utils::url_validator::UrlValidator;

/// State over the given stores. DNS verification is off so tests never hit
/// the network.
pub fn create_state(
    counters: Arc<dyn CounterRepository>,
    mappings: Arc<dyn MappingRepository>,
) -> AppState {
    AppState::new(
        counters,
        mappings,
        Arc::new(NullCache::new()),
        UrlValidator::new(false),
    )
}

/// Fresh in-memory state whose allocator has not been initialized.
pub fn create_memory_state() -> AppState {
    create_state(
        Arc::new(InMemoryCounterRepository::new()),
        Arc::new(InMemoryMappingRepository::new()),
    )
}

/// Fresh in-memory state, ready to accept creation requests.
pub async fn create_ready_memory_state() -> AppState {
    let state = create_memory_state();
    state.allocator.initialize().await.unwrap();
    state
}

/// PostgreSQL-backed state, ready to accept creation requests.
pub async fn create_ready_pg_state(pool: PgPool) -> AppState {
    let pool = Arc::new(pool);
    let state = create_state(
        Arc::new(PgCounterRepository::new(pool.clone())),
        Arc::new(PgMappingRepository::new(pool)),
    );
    state.allocator.initialize().await.unwrap();
    state
}

/// `/api` routes and `/health` without the rate limiter, which needs a peer
/// address the mock transport does not provide.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .with_state(state)
}

pub fn test_config() -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        database_url: None,
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: true,
        cache_ttl_seconds: 3600,
        verify_dns: false,
        counter_init_max_retries: 1,
        public_dir: "public".to_string(),
        index_file: "views/index.html".to_string(),
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 600,
        db_max_lifetime: 1800,
    }
}

pub async fn insert_mapping(pool: &PgPool, original: &str, short: i64) {
    sqlx::query("INSERT INTO urls (original, short) VALUES ($1, $2)")
        .bind(original)
        .bind(short)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn set_counter(pool: &PgPool, name: &str, seq: i64) {
    sqlx::query(
        "INSERT INTO counters (name, seq) VALUES ($1, $2)
         ON CONFLICT (name) DO UPDATE SET seq = EXCLUDED.seq",
    )
    .bind(name)
    .bind(seq)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn counter_value(pool: &PgPool, name: &str) -> Option<i64> {
    sqlx::query_scalar("SELECT seq FROM counters WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .unwrap()
}
